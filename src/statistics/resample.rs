//! Subject resampling with replacement.
//!
//! Each bootstrap replicate draws M subject indices uniformly from `[0, M)`.
//! Randomness is injected through [`IndexSource`] rather than taken from
//! ambient global state, and every replicate gets its own RNG stream derived
//! from the base seed and the replicate index. The stream for replicate `i`
//! is therefore the same whether replicates run sequentially or on a pool.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Source of uniform indices.
///
/// Implemented for every [`rand::Rng`]; implement it directly to script the
/// draws in tests or to plug in an external generator.
pub trait IndexSource {
    /// Draw an index uniformly from `[0, upper)`. `upper` is never zero.
    fn draw_index(&mut self, upper: usize) -> usize;
}

impl<R: Rng + ?Sized> IndexSource for R {
    #[inline]
    fn draw_index(&mut self, upper: usize) -> usize {
        self.random_range(0..upper)
    }
}

/// Counter-based seed derivation using SplitMix64.
///
/// A stateless mix of `base_seed` and `counter`; neighbouring counters give
/// unrelated seeds, unlike plain addition.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    // https://xoshiro.di.unimi.it/splitmix64.c
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// RNG dedicated to replicate `replicate` of a run seeded with `base_seed`.
#[inline]
pub fn replicate_rng(base_seed: u64, replicate: usize) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(base_seed, replicate as u64))
}

/// Use the configured seed, or draw a fresh one from the thread rng.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

/// Fill `out` with indices drawn with replacement from `[0, n_subjects)`.
///
/// `out` is one replicate set, so it normally has length `n_subjects`.
/// With a single subject every draw is 0.
///
/// # Panics
///
/// Panics if `n_subjects` is zero while `out` is non-empty.
pub fn resample_subjects_into<S: IndexSource + ?Sized>(
    source: &mut S,
    n_subjects: usize,
    out: &mut [usize],
) {
    assert!(
        n_subjects > 0 || out.is_empty(),
        "Cannot resample from zero subjects"
    );

    if n_subjects == 1 {
        out.fill(0);
        return;
    }

    for slot in out.iter_mut() {
        *slot = source.draw_index(n_subjects);
    }
}

/// Draw one replicate set of `n_subjects` indices.
pub fn resample_subjects<S: IndexSource + ?Sized>(source: &mut S, n_subjects: usize) -> Vec<usize> {
    let mut out = vec![0; n_subjects];
    resample_subjects_into(source, n_subjects, &mut out);
    out
}
