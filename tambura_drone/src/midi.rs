// Standard MIDI File output.
//
// Serializes a drone event stream into SMF Format 1: a meta track carrying
// the tempo and sequence name, then one note track with the instrument
// metadata and the events. Deltas pass through exactly as the sequencer
// computed them — this module never reinterprets timing or pitch. The
// drone deliberately carries no time-signature or key-signature events.
//
// Uses the `midly` crate for MIDI writing.

use crate::error::DroneError;
use crate::gm;
use crate::sequencer::Event;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Tempo, naming, and patch selection for the written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMeta {
    /// Beats per minute.
    pub bpm: u16,
    /// Sequence and track name, written verbatim.
    pub name: String,
    /// General MIDI program, 0-based.
    pub program: u8,
}

impl Default for TrackMeta {
    fn default() -> Self {
        TrackMeta {
            bpm: 120,
            name: "Stochastic Drone".to_string(),
            program: 88, // Pad 1 (new age)
        }
    }
}

/// Serialize events into an SMF and write it to `path`.
pub fn write_midi(events: &[Event], meta: &TrackMeta, path: &Path) -> Result<(), DroneError> {
    let smf = events_to_smf(events, meta)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Build the in-memory SMF: tempo/name track plus the note track.
pub fn events_to_smf<'a>(events: &[Event], meta: &'a TrackMeta) -> Result<Smf<'a>, DroneError> {
    if meta.bpm == 0 {
        return Err(DroneError::ZeroTempo);
    }
    let tempo_microseconds = 60_000_000 / u32::from(meta.bpm);
    // The SMF tempo field is 24 bits of microseconds per quarter note;
    // anything below 4 BPM no longer fits.
    if tempo_microseconds > 0x00ff_ffff {
        return Err(DroneError::TempoTooSlow(meta.bpm));
    }
    if meta.program > 127 {
        return Err(DroneError::ProgramOutOfRange(meta.program));
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo and sequence name only.
    let mut meta_track: Track<'a> = Vec::new();
    meta_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    meta_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(meta.name.as_bytes())),
    });
    meta_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(meta_track);

    // Track 1: the drone itself.
    let mut track: Track<'a> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(meta.name.as_bytes())),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::InstrumentName(
            gm::patch_name(meta.program).as_bytes(),
        )),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::ProgramChange {
                program: u7::new(meta.program),
            },
        },
    });
    for event in events {
        track.push(to_track_event(*event));
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    Ok(smf)
}

fn to_track_event(event: Event) -> TrackEvent<'static> {
    match event {
        Event::NoteOn {
            channel,
            pitch,
            velocity,
            delta,
        } => TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(channel),
                message: MidiMessage::NoteOn {
                    key: u7::new(pitch),
                    vel: u7::new(velocity),
                },
            },
        },
        Event::NoteOff {
            channel,
            pitch,
            velocity,
            delta,
        } => TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(channel),
                message: MidiMessage::NoteOff {
                    key: u7::new(pitch),
                    vel: u7::new(velocity),
                },
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::NoteOn { channel: 0, pitch: 60, velocity: 100, delta: 5 },
            Event::NoteOff { channel: 0, pitch: 60, velocity: 100, delta: 7 },
        ]
    }

    #[test]
    fn test_two_tracks_with_tempo_first() {
        let meta = TrackMeta::default();
        let smf = events_to_smf(&sample_events(), &meta).unwrap();
        assert_eq!(smf.tracks.len(), 2);
        // 120 BPM is half a million microseconds per quarter.
        assert_eq!(
            smf.tracks[0][0].kind,
            TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(500_000)))
        );
    }

    #[test]
    fn test_note_track_carries_program_change_and_instrument() {
        let meta = TrackMeta::default();
        let smf = events_to_smf(&sample_events(), &meta).unwrap();
        let track = &smf.tracks[1];
        assert_eq!(
            track[1].kind,
            TrackEventKind::Meta(midly::MetaMessage::InstrumentName(
                "Pad 1 (new age)".as_bytes()
            ))
        );
        assert_eq!(
            track[2].kind,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::ProgramChange { program: u7::new(88) },
            }
        );
    }

    #[test]
    fn test_deltas_pass_through_unchanged() {
        let meta = TrackMeta::default();
        let smf = events_to_smf(&sample_events(), &meta).unwrap();
        let track = &smf.tracks[1];
        // Name, instrument, program change, then the events.
        assert_eq!(track[3].delta, u28::new(5));
        assert_eq!(track[4].delta, u28::new(7));
        // Nothing after the events but the end-of-track marker.
        assert_eq!(
            track[5].kind,
            TrackEventKind::Meta(midly::MetaMessage::EndOfTrack)
        );
        assert_eq!(track.len(), 6);
    }

    #[test]
    fn test_degenerate_meta_is_rejected() {
        let events = sample_events();
        let zero = TrackMeta { bpm: 0, ..TrackMeta::default() };
        assert!(matches!(
            events_to_smf(&events, &zero),
            Err(DroneError::ZeroTempo)
        ));

        let glacial = TrackMeta { bpm: 3, ..TrackMeta::default() };
        assert!(matches!(
            events_to_smf(&events, &glacial),
            Err(DroneError::TempoTooSlow(3))
        ));

        let bad_program = TrackMeta { program: 128, ..TrackMeta::default() };
        assert!(matches!(
            events_to_smf(&events, &bad_program),
            Err(DroneError::ProgramOutOfRange(128))
        ));
    }
}
