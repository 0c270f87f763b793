// Stochastic note-length sources.
//
// The sequencer stretches its base note length by a factor drawn from a
// `DurationSource` — once per note-off and once per explicit rest. A
// constant source gives a steady pulse; an exponential source gives the
// loose, breathing timing the drone is really after.

use tambura_prng::DroneRng;

use crate::error::DroneError;

/// A pluggable source of duration scale factors.
///
/// Contract: `sample` returns a strictly positive, finite number. The
/// built-in sources guarantee this by construction; the sequencer rejects
/// a sample that breaks the contract at the moment of use.
pub trait DurationSource {
    fn sample(&mut self) -> f64;
}

/// Constant factor 1: every note lasts exactly the base length. Turns the
/// drone into a fixed pulse, and makes generation fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPulse;

impl DurationSource for FixedPulse {
    fn sample(&mut self) -> f64 {
        1.0
    }
}

/// Exponentially distributed factors with rate λ (mean 1/λ).
///
/// Owns its generator, so two sources built from the same rate and seed
/// produce identical factor streams.
#[derive(Debug, Clone)]
pub struct Exponential {
    rate: f64,
    rng: DroneRng,
}

impl Exponential {
    /// Build a source with the given rate, rejecting rates that could
    /// produce non-positive or non-finite samples.
    pub fn new(rate: f64, seed: u64) -> Result<Self, DroneError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DroneError::NonPositiveRate(rate));
        }
        Ok(Exponential {
            rate,
            rng: DroneRng::new(seed),
        })
    }
}

impl DurationSource for Exponential {
    fn sample(&mut self) -> f64 {
        // Inverse-CDF sampling. A u = 0 draw would map to an infinite
        // factor, so reject it; everything in (0, 1) maps to a strictly
        // positive finite value.
        loop {
            let u = self.rng.next_f64();
            if u > 0.0 {
                return -u.ln() / self.rate;
            }
        }
    }
}
