// Choice resolution policy.
//
// An optional note plays only when the policy says so. The policy is a
// small set of boolean outcomes sampled uniformly per draw: one true among
// four outcomes gives the classic drone where roughly a quarter of the
// bracketed notes sound on any pass.

use tambura_prng::DroneRng;

use crate::error::DroneError;

/// Decides whether a `Choice` step plays a note or stays silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    outcomes: Vec<bool>,
}

impl SelectionPolicy {
    /// Build from an explicit outcome set. An empty set could never be
    /// drawn from and is refused.
    pub fn new(outcomes: Vec<bool>) -> Result<Self, DroneError> {
        if outcomes.is_empty() {
            return Err(DroneError::EmptyPolicy);
        }
        Ok(SelectionPolicy { outcomes })
    }

    /// One playing outcome among `n`.
    pub fn one_in(n: usize) -> Result<Self, DroneError> {
        let mut outcomes = vec![false; n];
        if let Some(first) = outcomes.first_mut() {
            *first = true;
        }
        SelectionPolicy::new(outcomes)
    }

    /// Every optional note plays.
    pub fn always() -> Self {
        SelectionPolicy {
            outcomes: vec![true],
        }
    }

    /// No optional note ever plays.
    pub fn never() -> Self {
        SelectionPolicy {
            outcomes: vec![false],
        }
    }

    /// Draw one outcome uniformly from the set.
    pub fn draw(&self, rng: &mut DroneRng) -> bool {
        *rng.pick(&self.outcomes)
    }

    /// The fraction of draws that play, for display.
    pub fn probability(&self) -> f64 {
        let trues = self.outcomes.iter().filter(|&&o| o).count();
        trues as f64 / self.outcomes.len() as f64
    }
}
