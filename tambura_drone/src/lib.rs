// Stochastic Tambura Drone
//
// Generates a MIDI drone track with no time signature: a fixed tambura
// figure replayed many times, with individual notes optionally omitted,
// substituted from alternatives, or ornamented, and with the gaps between
// notes stochastically stretched. Modeled on the tampura method John Pitts
// describes in "How to Play Indian Sitar Ragas on a Piano". Renders best
// on patches with long release times — long pads.
//
// Architecture:
// - pattern.rs: the declarative pattern model (fixed/grace/rest/choice steps)
// - catalog.rs: named built-in tambura figures
// - duration.rs: pluggable positive duration sources (fixed pulse, exponential)
// - select.rs: the policy deciding whether an optional note plays
// - sequencer.rs: the interpreter — walks the pattern and emits timed events
// - midi.rs: Standard MIDI File output via `midly`
// - gm.rs: General MIDI patch names for instrument metadata
// - error.rs: the fatal configuration-error type
//
// Generation is deterministic given a seed, supporting reproducible output.

pub mod catalog;
pub mod duration;
pub mod error;
pub mod gm;
pub mod midi;
pub mod pattern;
pub mod select;
pub mod sequencer;
