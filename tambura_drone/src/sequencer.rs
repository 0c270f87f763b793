// The drone engine: pattern interpretation and event timing.
//
// Walks a pattern `repeats` times, resolving each step against a duration
// source and a selection policy, and emits note-on/note-off events with
// accumulated tick deltas. The structure of a run is deterministic; the
// timing and the choice resolutions are whatever the injected sources say,
// so a seeded run reproduces exactly.
//
// The one piece of state beyond the step cursor is the pending-time
// accumulator: ticks of silence owed to the next note-on. Rests grow it,
// note-ons consume it, and a declined choice leaves it alone — silence
// from a declined choice costs no time, unlike an explicit rest. That
// asymmetry is deliberate; the tests pin it down.

use serde::{Deserialize, Serialize};
use tambura_prng::DroneRng;

use crate::duration::DurationSource;
use crate::error::DroneError;
use crate::pattern::{Alternative, Pattern, Step};
use crate::select::SelectionPolicy;

/// The drone always renders on MIDI channel 0.
const CHANNEL: u8 = 0;

/// A timed note event. `delta` is ticks since the previous event on the
/// same track — the Standard MIDI File's native time encoding. Event order
/// is the contract: consumers must preserve it and the deltas exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    NoteOn {
        channel: u8,
        pitch: u8,
        velocity: u8,
        delta: u32,
    },
    NoteOff {
        channel: u8,
        pitch: u8,
        velocity: u8,
        delta: u32,
    },
}

/// Fixed parameters of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneParams {
    /// MIDI pitch all pattern offsets are relative to.
    pub tonic: u8,
    /// Ticks of one reference beat. The classic drone uses four quarter
    /// notes at 480 ticks per quarter.
    pub base_note_len: u32,
    /// How many times the pattern is replayed.
    pub repeats: u32,
    /// Velocity for every note-on and note-off. No per-note dynamics.
    pub velocity: u8,
}

impl Default for DroneParams {
    fn default() -> Self {
        DroneParams {
            tonic: 60, // middle C
            base_note_len: 4 * 480,
            repeats: 24,
            velocity: 100,
        }
    }
}

/// Render the complete event stream for a drone run.
///
/// Every precondition is checked before the first event is emitted, so the
/// result is either the full stream for all repeats or an error and no
/// events at all.
pub fn generate(
    pattern: &Pattern,
    params: &DroneParams,
    durations: &mut impl DurationSource,
    policy: &SelectionPolicy,
    rng: &mut DroneRng,
) -> Result<Vec<Event>, DroneError> {
    validate(pattern, params)?;

    let mut events = Vec::new();
    // Ticks of silence owed to the next note-on. Carried across repeats;
    // reset only when a note-on claims it. Whatever is left when the last
    // repeat ends is discarded — the file just ends sooner.
    let mut pending: u32 = 0;

    for _ in 0..params.repeats {
        for step in pattern.steps() {
            match step {
                Step::Fixed(offset) => {
                    emit_note(&mut events, &mut pending, params, durations, *offset)?;
                }
                Step::Grace { first, second } => {
                    emit_grace(&mut events, &mut pending, params, durations, *first, *second)?;
                }
                Step::Rest => {
                    pending += scaled_ticks(params.base_note_len, durations)?;
                }
                Step::Choice(alternatives) => {
                    if policy.draw(rng) {
                        match *rng.pick(alternatives) {
                            Alternative::Note(offset) => {
                                emit_note(&mut events, &mut pending, params, durations, offset)?;
                            }
                            Alternative::Grace { first, second } => {
                                emit_grace(
                                    &mut events,
                                    &mut pending,
                                    params,
                                    durations,
                                    first,
                                    second,
                                )?;
                            }
                        }
                    }
                    // Declined: free silence. Pending time is deliberately
                    // left untouched.
                }
            }
        }
    }

    Ok(events)
}

/// Check every precondition of a run: parameter sanity, pattern shape, and
/// that all reachable pitches stay inside MIDI range.
fn validate(pattern: &Pattern, params: &DroneParams) -> Result<(), DroneError> {
    if params.repeats == 0 {
        return Err(DroneError::ZeroRepeats);
    }
    if params.base_note_len == 0 {
        return Err(DroneError::ZeroNoteLength);
    }
    if params.tonic > 127 {
        return Err(DroneError::TonicOutOfRange(params.tonic));
    }
    if params.velocity > 127 {
        return Err(DroneError::VelocityOutOfRange(params.velocity));
    }
    pattern.validate()?;
    for offset in pattern.offsets() {
        offset_pitch(params.tonic, offset)?;
    }
    Ok(())
}

/// The shared emission tail: a note-on claiming the pending silence, then
/// its note-off after a freshly sampled duration.
fn emit_note(
    events: &mut Vec<Event>,
    pending: &mut u32,
    params: &DroneParams,
    durations: &mut impl DurationSource,
    offset: i8,
) -> Result<(), DroneError> {
    let pitch = offset_pitch(params.tonic, offset)?;
    events.push(Event::NoteOn {
        channel: CHANNEL,
        pitch,
        velocity: params.velocity,
        delta: *pending,
    });
    *pending = 0;
    events.push(Event::NoteOff {
        channel: CHANNEL,
        pitch,
        velocity: params.velocity,
        delta: scaled_ticks(params.base_note_len, durations)?,
    });
    Ok(())
}

/// A grace figure: the lead note takes the pending silence and lasts a
/// fixed 1/32 of the base length, then the sustained note follows through
/// the normal emission tail.
fn emit_grace(
    events: &mut Vec<Event>,
    pending: &mut u32,
    params: &DroneParams,
    durations: &mut impl DurationSource,
    first: i8,
    second: i8,
) -> Result<(), DroneError> {
    let lead = offset_pitch(params.tonic, first)?;
    events.push(Event::NoteOn {
        channel: CHANNEL,
        pitch: lead,
        velocity: params.velocity,
        delta: *pending,
    });
    *pending = 0;
    events.push(Event::NoteOff {
        channel: CHANNEL,
        pitch: lead,
        velocity: params.velocity,
        delta: params.base_note_len / 32,
    });
    emit_note(events, pending, params, durations, second)
}

/// Stretch the base length by one duration sample, truncated to whole
/// ticks. A sample violating the positivity contract aborts the run.
fn scaled_ticks(base: u32, durations: &mut impl DurationSource) -> Result<u32, DroneError> {
    let factor = durations.sample();
    if !factor.is_finite() || factor <= 0.0 {
        return Err(DroneError::BadDurationSample(factor));
    }
    Ok((base as f64 * factor) as u32)
}

/// Apply a semitone offset to the tonic, refusing to leave MIDI range.
/// No clamping: a figure that would wrap off the keyboard is a
/// configuration error, not a different figure.
fn offset_pitch(tonic: u8, offset: i8) -> Result<u8, DroneError> {
    let pitch = tonic as i16 + offset as i16;
    if (0..=127).contains(&pitch) {
        Ok(pitch as u8)
    } else {
        Err(DroneError::PitchOutOfRange {
            tonic,
            offset,
            pitch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{Exponential, FixedPulse};
    use std::collections::HashSet;

    fn params(base_note_len: u32, repeats: u32) -> DroneParams {
        DroneParams {
            tonic: 60,
            base_note_len,
            repeats,
            velocity: 100,
        }
    }

    /// Run with the fixed pulse and a fixed seed.
    fn run(pattern: &Pattern, params: &DroneParams, policy: &SelectionPolicy) -> Vec<Event> {
        let mut rng = DroneRng::new(42);
        generate(pattern, params, &mut FixedPulse, policy, &mut rng).unwrap()
    }

    #[test]
    fn test_fixed_note_repeats_exactly() {
        let pattern = Pattern::new(vec![Step::Fixed(0)]);
        let events = run(&pattern, &params(16, 2), &SelectionPolicy::always());
        assert_eq!(
            events,
            vec![
                Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 0 },
                Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 16 },
                Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 0 },
                Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 16 },
            ]
        );
    }

    #[test]
    fn test_rest_becomes_the_next_note_on_delta() {
        let pattern = Pattern::new(vec![Step::Rest, Step::Fixed(0)]);
        let events = run(&pattern, &params(16, 1), &SelectionPolicy::always());
        assert_eq!(
            events,
            vec![
                Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 16 },
                Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 16 },
            ]
        );
    }

    #[test]
    fn test_grace_is_a_short_lead_then_the_sustained_note() {
        let pattern = Pattern::new(vec![Step::Grace { first: -12, second: -7 }]);
        let events = run(&pattern, &params(32, 1), &SelectionPolicy::always());
        assert_eq!(
            events,
            vec![
                Event::NoteOn { channel: 0, pitch: 48, velocity: 100, delta: 0 },
                Event::NoteOff { channel: 0, pitch: 48, velocity: 100, delta: 1 },
                Event::NoteOn { channel: 0, pitch: 53, velocity: 100, delta: 0 },
                Event::NoteOff { channel: 0, pitch: 53, velocity: 100, delta: 32 },
            ]
        );
    }

    #[test]
    fn test_grace_lead_length_truncates_to_zero_on_short_bases() {
        // 16 / 32 truncates to 0 ticks: the lead becomes instantaneous
        // rather than rounding up.
        let pattern = Pattern::new(vec![Step::Grace { first: 0, second: 0 }]);
        let events = run(&pattern, &params(16, 1), &SelectionPolicy::always());
        assert_eq!(
            events[1],
            Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 0 }
        );
    }

    #[test]
    fn test_declined_choice_leaves_the_accumulator_untouched() {
        // The rest owes 16 ticks. The declined choice between the rest and
        // the fixed note must not add to that debt — only an explicit rest
        // buys time.
        let pattern = Pattern::new(vec![
            Step::Rest,
            Step::Choice(vec![Alternative::Note(0)]),
            Step::Fixed(0),
        ]);
        let events = run(&pattern, &params(16, 1), &SelectionPolicy::never());
        assert_eq!(
            events,
            vec![
                Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 16 },
                Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 16 },
            ]
        );
    }

    #[test]
    fn test_chosen_notes_come_from_the_alternatives() {
        let pattern = Pattern::new(vec![Step::Choice(vec![
            Alternative::Note(2),
            Alternative::Note(4),
            Alternative::Note(5),
        ])]);
        let events = run(&pattern, &params(16, 64), &SelectionPolicy::always());
        assert_eq!(events.len(), 128);
        let mut seen = HashSet::new();
        for event in &events {
            if let Event::NoteOn { pitch, .. } = event {
                assert!([62, 64, 65].contains(pitch), "pitch {pitch} not offered");
                seen.insert(*pitch);
            }
        }
        // 64 uniform draws over three alternatives hit more than one.
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_grace_alternative_plays_like_a_grace_step() {
        let choice = Pattern::new(vec![Step::Choice(vec![Alternative::Grace {
            first: -4,
            second: -2,
        }])]);
        let plain = Pattern::new(vec![Step::Grace { first: -4, second: -2 }]);
        let p = params(32, 1);
        assert_eq!(
            run(&choice, &p, &SelectionPolicy::always()),
            run(&plain, &p, &SelectionPolicy::always()),
        );
    }

    #[test]
    fn test_accumulator_carries_across_repeats_and_trailing_rest_is_dropped() {
        let pattern = Pattern::new(vec![Step::Fixed(0), Step::Rest]);
        let events = run(&pattern, &params(16, 2), &SelectionPolicy::always());
        // The first repeat's rest surfaces as the second repeat's note-on
        // delta; the second repeat's rest has no note left to pay it to.
        assert_eq!(
            events,
            vec![
                Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 0 },
                Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 16 },
                Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 16 },
                Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 16 },
            ]
        );
    }

    #[test]
    fn test_seeded_runs_reproduce_exactly() {
        let pattern = crate::catalog::by_name("bliss").unwrap();
        let p = params(1920, 8);
        let policy = SelectionPolicy::one_in(4).unwrap();
        let render = || {
            let mut durations = Exponential::new(1.0, 7).unwrap();
            let mut rng = DroneRng::new(9);
            generate(&pattern, &p, &mut durations, &policy, &mut rng).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_note_off_always_lands_before_a_retrigger() {
        let pattern = crate::catalog::by_name("full_of_hope").unwrap();
        let p = params(1920, 32);
        let policy = SelectionPolicy::one_in(2).unwrap();
        let mut durations = Exponential::new(1.0, 3).unwrap();
        let mut rng = DroneRng::new(4);
        let events = generate(&pattern, &p, &mut durations, &policy, &mut rng).unwrap();
        assert!(!events.is_empty());

        let mut sounding: HashSet<(u8, u8)> = HashSet::new();
        for event in &events {
            match *event {
                Event::NoteOn { channel, pitch, .. } => {
                    assert!(
                        sounding.insert((channel, pitch)),
                        "pitch {pitch} retriggered while sounding"
                    );
                }
                Event::NoteOff { channel, pitch, .. } => {
                    assert!(
                        sounding.remove(&(channel, pitch)),
                        "note-off for silent pitch {pitch}"
                    );
                }
            }
        }
        assert!(sounding.is_empty(), "notes left sounding: {sounding:?}");
    }

    #[test]
    fn test_empty_choice_is_rejected_up_front() {
        let pattern = Pattern::new(vec![Step::Fixed(0), Step::Choice(vec![])]);
        let mut rng = DroneRng::new(42);
        let err = generate(
            &pattern,
            &params(16, 1),
            &mut FixedPulse,
            &SelectionPolicy::always(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, DroneError::EmptyChoice { step: 1 }));
    }

    #[test]
    fn test_degenerate_parameters_are_rejected() {
        let pattern = Pattern::new(vec![Step::Fixed(0)]);
        let mut rng = DroneRng::new(42);
        let policy = SelectionPolicy::always();

        let err = generate(&pattern, &params(16, 0), &mut FixedPulse, &policy, &mut rng)
            .unwrap_err();
        assert!(matches!(err, DroneError::ZeroRepeats));

        let err = generate(&pattern, &params(0, 1), &mut FixedPulse, &policy, &mut rng)
            .unwrap_err();
        assert!(matches!(err, DroneError::ZeroNoteLength));

        let mut loud = params(16, 1);
        loud.velocity = 200;
        let err = generate(&pattern, &loud, &mut FixedPulse, &policy, &mut rng).unwrap_err();
        assert!(matches!(err, DroneError::VelocityOutOfRange(200)));

        let mut high = params(16, 1);
        high.tonic = 130;
        let err = generate(&pattern, &high, &mut FixedPulse, &policy, &mut rng).unwrap_err();
        assert!(matches!(err, DroneError::TonicOutOfRange(130)));
    }

    #[test]
    fn test_out_of_range_pitches_are_rejected_before_any_event() {
        let mut rng = DroneRng::new(42);
        let policy = SelectionPolicy::always();

        // 60 + 70 = 130, off the top of the keyboard. The first step is
        // playable, but nothing may be emitted for a doomed run.
        let pattern = Pattern::new(vec![Step::Fixed(0), Step::Fixed(70)]);
        let err = generate(&pattern, &params(16, 1), &mut FixedPulse, &policy, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            DroneError::PitchOutOfRange { tonic: 60, offset: 70, pitch: 130 }
        ));

        // Same below the keyboard, reached through a choice alternative.
        let low = DroneParams { tonic: 2, ..params(16, 1) };
        let pattern = Pattern::new(vec![Step::Choice(vec![Alternative::Note(-5)])]);
        let err = generate(&pattern, &low, &mut FixedPulse, &policy, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            DroneError::PitchOutOfRange { tonic: 2, offset: -5, pitch: -3 }
        ));
    }

    #[test]
    fn test_contract_breaking_duration_source_aborts() {
        struct Stuck;
        impl DurationSource for Stuck {
            fn sample(&mut self) -> f64 {
                0.0
            }
        }

        let pattern = Pattern::new(vec![Step::Fixed(0)]);
        let mut rng = DroneRng::new(42);
        let err = generate(
            &pattern,
            &params(16, 1),
            &mut Stuck,
            &SelectionPolicy::always(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, DroneError::BadDurationSample(_)));
    }
}
