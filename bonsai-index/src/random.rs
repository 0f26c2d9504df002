//! # Random Sources
//!
//! Seeded randomness for center selection. All draws go through one
//! `StdRng` owned by the index, so a fixed seed makes builds
//! reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform integer in `[0, n)`
#[inline]
pub fn rand_int(rng: &mut StdRng, n: usize) -> usize {
    debug_assert!(n > 0);
    rng.gen_range(0..n)
}

/// Uniform double in `[0, x)`; returns 0 for a zero or negative bound
#[inline]
pub fn rand_double(rng: &mut StdRng, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    rng.gen_range(0.0..x)
}

/// Draw-without-replacement source over `[0, n)`.
///
/// Yields a random permutation one element at a time; `next` returns
/// `None` once every value has been produced.
pub struct UniqueRandom {
    order: Vec<usize>,
    cursor: usize,
}

impl UniqueRandom {
    pub fn new(n: usize, rng: &mut StdRng) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Self { order, cursor: 0 }
    }

    pub fn next(&mut self) -> Option<usize> {
        let value = self.order.get(self.cursor).copied();
        self.cursor += 1;
        value
    }
}
