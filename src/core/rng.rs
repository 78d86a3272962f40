//! Deterministic random number generation for editing gestures
//!
//! Tools seed one generator per gesture from the raycast hit coordinate, so
//! density gating and palette picks are stable while the cursor rests on the
//! same voxel.

use crate::core::types::UVec3;

/// Xorshift64 generator with explicit state
#[derive(Clone, Copy, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a generator from a seed; a zero seed would lock xorshift at
    /// zero forever, so it is bumped to one.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    /// Seed from a voxel coordinate
    pub fn from_coord(coord: UVec3) -> Self {
        Self::new(coord.x as u64 | (coord.y as u64) << 8 | (coord.z as u64) << 16)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in `[min, max)`
    pub fn next_f32(&mut self, min: f32, max: f32) -> f32 {
        self.next_u64() as u32 as f32 / u32::MAX as f32 * (max - min) + min
    }
}
