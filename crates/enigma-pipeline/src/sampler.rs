//! Deterministic point sampling.
//!
//! A `mulberry32` generator seeded from the low 32 bits of the user seed.
//! The output sequence is bit-identical to the widely used JavaScript
//! version, so a given seed always produces the same painting.

use crate::types::{Dimensions, Point};

/// The `mulberry32` pseudo-random generator.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Seed from the low 32 bits of `seed` (two's complement for negatives).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn new(seed: i64) -> Self {
        Self { state: seed as u32 }
    }

    /// Next raw 32-bit output.
    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value uniformly distributed in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Sample `complexity` points uniformly over `canvas`.
///
/// Each point consumes two draws, x first. A complexity of zero is
/// treated as one.
#[must_use]
pub fn sample_points(seed: i64, complexity: u32, canvas: Dimensions) -> Vec<Point> {
    let mut rng = Mulberry32::new(seed);
    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);
    (0..complexity.max(1))
        .map(|_| {
            let x = rng.next_f64() * width;
            let y = rng.next_f64() * height;
            Point::new(x, y)
        })
        .collect()
}
