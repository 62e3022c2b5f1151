//! Deterministic PRNG used to spawn particles.
//!
//! The browser host seeds it from the clock so every page load differs; the
//! CLI and the tests seed it explicitly so snapshots are reproducible.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Xorshift64 PRNG (shifts 13, 7, 17). Same seed, same sequence.
///
/// A seed of 0 is a fixed point of xorshift and is replaced with a
/// non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1), built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform f64 in [-half_width, half_width).
    pub fn next_signed(&mut self, half_width: f64) -> f64 {
        self.next_range(-half_width, half_width)
    }

    /// Uniform angle in [0, 2π).
    pub fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Snapshots rendered with a given seed depend on this sequence.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_uses_fallback() {
        let mut zero = Xorshift64::new(0);
        let mut fallback = Xorshift64::new(Xorshift64::FALLBACK_SEED);
        assert_ne!(zero.next_u64(), 0);
        assert_eq!(zero.next_u64(), {
            fallback.next_u64();
            fallback.next_u64()
        });
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at index {i}");
        }
    }

    #[test]
    fn next_signed_is_symmetric_range() {
        let mut rng = Xorshift64::new(7);
        let (mut saw_neg, mut saw_pos) = (false, false);
        for _ in 0..10_000 {
            let v = rng.next_signed(0.25);
            assert!((-0.25..0.25).contains(&v), "{v} out of range");
            saw_neg |= v < 0.0;
            saw_pos |= v > 0.0;
        }
        assert!(saw_neg && saw_pos);
    }

    #[test]
    fn next_angle_within_full_turn() {
        let mut rng = Xorshift64::new(99);
        for _ in 0..10_000 {
            let a = rng.next_angle();
            assert!((0.0..TAU).contains(&a), "{a} out of [0, 2pi)");
        }
    }

    #[test]
    fn serialization_preserves_mid_stream_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "{v} out of [0, 1)");
                }
            }

            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                span in 1e-3_f64..1e4,
            ) {
                let max = min + span;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} outside [{min}, {max})");
                }
            }
        }
    }
}
