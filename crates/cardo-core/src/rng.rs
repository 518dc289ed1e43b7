//! Random number generator abstraction for determinism.
//!
//! Production code draws from [`StdRandom`]; tests inject a scripted
//! implementation so card draws and shuffles are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// [`DeterministicRng`] backed by rand's `StdRng`.
#[derive(Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Seeds from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeds from a fixed value, making every draw reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for StdRandom {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}

/// Shuffles `items` in place with a forward Fisher-Yates pass.
///
/// Each step draws from `[i, len - 1]`, so an RNG that always answers the
/// lower bound leaves the slice untouched.
#[allow(clippy::cast_possible_truncation)]
pub fn shuffle<T>(rng: &mut dyn DeterministicRng, items: &mut [T]) {
    let len = items.len();
    if len < 2 {
        return;
    }
    for i in 0..len - 1 {
        let j = rng.next_u32_range(i as u32, (len - 1) as u32) as usize;
        items.swap(i, j.min(len - 1));
    }
}

/// Picks `k` distinct elements of `pool` without replacement, uniformly.
///
/// Returns fewer than `k` elements only when `pool` is shorter than `k`.
pub fn sample_without_replacement<T: Clone>(
    rng: &mut dyn DeterministicRng,
    pool: &[T],
    k: usize,
) -> Vec<T> {
    let mut scratch = pool.to_vec();
    let take = k.min(scratch.len());
    partial_shuffle(rng, &mut scratch, take);
    scratch.truncate(take);
    scratch
}

#[allow(clippy::cast_possible_truncation)]
fn partial_shuffle<T>(rng: &mut dyn DeterministicRng, items: &mut [T], steps: usize) {
    let len = items.len();
    for i in 0..steps.min(len) {
        let j = rng.next_u32_range(i as u32, (len - 1) as u32) as usize;
        items.swap(i, j.min(len - 1));
    }
}
