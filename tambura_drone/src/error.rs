// Configuration errors.
//
// Everything here is fatal: generation either produces the complete event
// stream for all repeats or nothing at all. There is no recovery, retry,
// or partial output anywhere in the engine.

use thiserror::Error;

/// The ways a drone run can be refused or aborted.
#[derive(Debug, Error)]
pub enum DroneError {
    #[error("step {step}: choice has no alternatives")]
    EmptyChoice { step: usize },

    #[error("selection policy has no outcomes")]
    EmptyPolicy,

    #[error("repeat count must be at least 1")]
    ZeroRepeats,

    #[error("base note length must be at least 1 tick")]
    ZeroNoteLength,

    #[error("tonic {0} exceeds the MIDI maximum of 127")]
    TonicOutOfRange(u8),

    #[error("velocity {0} exceeds the MIDI maximum of 127")]
    VelocityOutOfRange(u8),

    #[error("program {0} exceeds the MIDI maximum of 127")]
    ProgramOutOfRange(u8),

    #[error("tempo must be at least 1 BPM")]
    ZeroTempo,

    #[error("tempo {0} BPM is too slow to encode in a MIDI tempo event")]
    TempoTooSlow(u16),

    #[error("exponential rate must be positive and finite, got {0}")]
    NonPositiveRate(f64),

    #[error("duration source returned {0}, expected a positive finite number")]
    BadDurationSample(f64),

    #[error("tonic {tonic} with offset {offset} gives pitch {pitch}, outside MIDI range 0-127")]
    PitchOutOfRange { tonic: u8, offset: i8, pitch: i16 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
