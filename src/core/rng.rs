//! Permuted congruential generator (PCG32), the only source of
//! randomness in the renderer. Every worker owns its own stream so
//! results are reproducible for a given seed and tile order.

use hexf::*;

// pbrt
use crate::core::pbrt::Float;

/// Largest float strictly below one.
pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");
pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl Rng {
    pub fn new(sequence_index: u64) -> Self {
        let mut rng: Rng = Rng::default();
        rng.set_sequence(sequence_index);
        rng
    }
    /// Select one of 2^63 independent streams.
    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0_u64;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let old: u64 = self.state;
        self.state = old.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = ((old.wrapping_shr(18) ^ old).wrapping_shr(27)) as u32;
        let rot: u32 = old.wrapping_shr(59) as u32;
        xorshifted.rotate_right(rot)
    }
    /// Uniform in `[0, b)` without modulo bias.
    pub fn uniform_uint32_bounded(&mut self, b: u32) -> u32 {
        let threshold: u32 = b.wrapping_neg() % b;
        loop {
            let r: u32 = self.uniform_uint32();
            if r >= threshold {
                return r % b;
            }
        }
    }
    /// Uniform in `[0, 1)`.
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf32!("0x1.0p-32") as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_reproducible_and_distinct() {
        let mut a: Rng = Rng::new(7);
        let mut b: Rng = Rng::new(7);
        let mut c: Rng = Rng::new(8);
        let sa: Vec<u32> = (0..8).map(|_| a.uniform_uint32()).collect();
        let sb: Vec<u32> = (0..8).map(|_| b.uniform_uint32()).collect();
        let sc: Vec<u32> = (0..8).map(|_| c.uniform_uint32()).collect();
        assert_eq!(sa, sb);
        assert_ne!(sa, sc);
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng: Rng = Rng::new(1);
        for _ in 0..10_000 {
            let u: Float = rng.uniform_float();
            assert!((0.0..1.0).contains(&u));
        }
        for _ in 0..1000 {
            assert!(rng.uniform_uint32_bounded(5) < 5);
        }
    }
}
