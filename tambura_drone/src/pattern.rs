// The pattern model: the declarative description a drone is rendered from.
//
// A pattern is an ordered list of steps. Steps carry no timing and no
// randomness of their own; all interpretation lives in sequencer.rs. The
// pattern is built once (from the catalog or a JSON file) and read-only
// afterwards, so one pattern can back any number of generation runs.
//
// Offsets are signed semitone displacements from a tonic supplied at
// generation time. The same figure can be droned from any root.

use serde::{Deserialize, Serialize};

use crate::error::DroneError;

/// One alternative inside a `Step::Choice`.
///
/// Choice lists usually hold plain offsets, but a few of the traditional
/// figures offer an ornament as one of the options, so an alternative can
/// also be a full grace pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alternative {
    /// A plain offset, interpreted like `Step::Fixed` once chosen.
    Note(i8),
    /// A grace figure, interpreted like `Step::Grace` once chosen.
    Grace { first: i8, second: i8 },
}

/// A single step of a tambura pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// One note at a fixed semitone offset from the tonic.
    Fixed(i8),
    /// An ornamental pair: a brief lead note, then a sustained note.
    Grace { first: i8, second: i8 },
    /// Silence. Accrues pending time that the next note-on will absorb.
    Rest,
    /// An optional note: resolves at interpretation time either to silence
    /// or to one uniformly-sampled alternative.
    Choice(Vec<Alternative>),
}

/// An ordered, immutable sequence of steps.
///
/// Serializes as a bare step array, which is also the on-disk JSON format
/// accepted by the CLI's `--pattern-file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    steps: Vec<Step>,
}

impl Pattern {
    pub fn new(steps: Vec<Step>) -> Self {
        Pattern { steps }
    }

    /// The steps in declared order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check the pattern for malformed steps.
    ///
    /// The only way to malform a pattern is a `Choice` with no
    /// alternatives: it could neither play nor be meaningfully skipped.
    /// Reports the index of the first offender.
    pub fn validate(&self) -> Result<(), DroneError> {
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Choice(alternatives) = step {
                if alternatives.is_empty() {
                    return Err(DroneError::EmptyChoice { step: index });
                }
            }
        }
        Ok(())
    }

    /// Every semitone offset the pattern can reach, across all step kinds
    /// and choice alternatives. Used to prove the whole pattern stays in
    /// MIDI range before a run starts.
    pub fn offsets(&self) -> Vec<i8> {
        let mut out = Vec::new();
        for step in &self.steps {
            match step {
                Step::Fixed(offset) => out.push(*offset),
                Step::Grace { first, second } => {
                    out.push(*first);
                    out.push(*second);
                }
                Step::Rest => {}
                Step::Choice(alternatives) => {
                    for alt in alternatives {
                        match alt {
                            Alternative::Note(offset) => out.push(*offset),
                            Alternative::Grace { first, second } => {
                                out.push(*first);
                                out.push(*second);
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_pattern() {
        let pattern = Pattern::new(vec![
            Step::Fixed(-5),
            Step::Grace { first: -12, second: -7 },
            Step::Rest,
            Step::Choice(vec![Alternative::Note(0), Alternative::Note(2)]),
        ]);
        assert!(pattern.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_choice() {
        let pattern = Pattern::new(vec![Step::Fixed(0), Step::Choice(vec![])]);
        let err = pattern.validate().unwrap_err();
        assert!(matches!(err, DroneError::EmptyChoice { step: 1 }));
    }

    #[test]
    fn test_offsets_cover_all_step_kinds() {
        let pattern = Pattern::new(vec![
            Step::Fixed(-5),
            Step::Rest,
            Step::Grace { first: 1, second: 0 },
            Step::Choice(vec![
                Alternative::Note(4),
                Alternative::Grace { first: -2, second: -1 },
            ]),
        ]);
        assert_eq!(pattern.offsets(), vec![-5, 1, 0, 4, -2, -1]);
    }

    #[test]
    fn test_pattern_file_format_is_a_step_array() {
        let json = r#"[{"Fixed":-5},"Rest",{"Grace":{"first":1,"second":0}},{"Choice":[{"Note":2}]}]"#;
        let pattern: Pattern = serde_json::from_str(json).unwrap();
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.steps()[0], Step::Fixed(-5));
        assert_eq!(pattern.steps()[1], Step::Rest);
    }
}
