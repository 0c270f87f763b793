// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256** (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled with zero external dependencies so that a drone rendered from
// a given seed is bit-identical on every platform and compiler version.
//
// This crate is the single randomness source for the tambura project: the
// sequencer draws choice resolutions from it and the stochastic duration
// sources own their own instance. Nothing else in the workspace generates
// random numbers.
//
// **Critical constraint: determinism.** Every method must produce identical
// output given the same prior state, on every platform. The core generator
// is pure integer arithmetic; floats only appear in derived convenience
// methods that map an already-drawn `u64` into [0, 1).

use serde::{Deserialize, Serialize};

/// Xoshiro256** PRNG — the project's sole source of randomness.
///
/// Each consumer owns its own `DroneRng`, seeded deterministically, so the
/// random streams of independent generation runs never interleave.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DroneRng {
    s: [u64; 4],
}

impl DroneRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, per the xoshiro
    /// authors' recommendation. Equal seeds give equal output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        let mut s = [0u64; 4];
        for slot in &mut s {
            *slot = splitmix64(&mut sm);
        }
        Self { s }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = self.s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1).
    ///
    /// Uses the upper 53 bits of a `u64` to fill the f64 mantissa (52
    /// explicit bits + 1 implicit), the standard full-precision technique.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Return `true` with probability `p`.
    ///
    /// `p <= 0.0` always returns false, `p >= 1.0` always returns true.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index into a collection of length `len`.
    ///
    /// Uses rejection sampling to avoid modulo bias. Panics if `len == 0`.
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "index: len must be nonzero");
        let len = len as u64;
        if len.is_power_of_two() {
            return (self.next_u64() & (len - 1)) as usize;
        }
        // Reject draws below (2^64 - len) % len to keep the mapping uniform.
        let threshold = len.wrapping_neg() % len;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return (r % len) as usize;
            }
        }
    }

    /// Pick a uniformly random element of a nonempty slice.
    ///
    /// Panics if the slice is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }
}

/// SplitMix64 — used only to expand a `u64` seed into the xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
