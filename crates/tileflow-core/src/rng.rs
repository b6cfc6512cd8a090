//! Seeded PRNG backing the time-scaled effect rolls (fire, steam).
//!
//! SplitMix64: 8 bytes of state, no allocation, identical output on every
//! platform for the same seed.

use crate::fixed::Fixed64;

/// SplitMix64 pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_unit(&mut self) -> Fixed64 {
        // Upper 32 bits land directly in the fractional half of Q32.32.
        Fixed64::from_bits((self.next_u64() >> 32) as i64)
    }

    /// Returns `true` with probability `p`. `p <= 0` never hits, `p >= 1`
    /// always hits.
    pub fn chance(&mut self, p: Fixed64) -> bool {
        if p <= Fixed64::ZERO {
            return false;
        }
        if p >= Fixed64::ONE {
            return true;
        }
        self.next_unit() < p
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}
