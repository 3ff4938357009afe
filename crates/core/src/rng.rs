//! Seeded uniform streams backing every random decision of a theming pass.
//!
//! A pass owns two independent streams seeded from the same build seed: one
//! for theme picks, rule callbacks, and asset-pool indices, one dedicated to
//! affinity draws. Draw order is part of the determinism contract, so the
//! streams are never shared or reordered.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub struct UniformStream {
    rng: ChaCha8Rng,
}

impl UniformStream {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform draw in [0, 1). Built from 24 bits so the value is exactly
    /// representable in f32.
    pub fn next_uniform(&mut self) -> f32 {
        (self.rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// `floor(u * len) % len`, the pick formula used for theme and asset
    /// pool selection.
    pub fn pick_index(&mut self, len: usize) -> usize {
        (self.next_uniform() * len as f32).floor() as usize % len
    }
}
