//! Row and feature sampling for the tree ensembles.
//!
//! - [`bootstrap`]: rows drawn with replacement (forest bagging)
//! - [`sample_features`]: features drawn without replacement, in random order
//!   (per-node candidates)
//! - [`mix_seed`]: derive independent per-tree seeds from a config seed

use rand::Rng;

const GOLDEN_GAMMA: u64 = 0x9E3779B97F4A7C15;

/// Seed for stream `index` derived from `seed`.
#[inline]
pub fn mix_seed(seed: u64, index: u64) -> u64 {
    seed.wrapping_add(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA))
}

/// Bootstrap sample size: `max(1, round(n * ratio))`.
#[inline]
pub fn bootstrap_size(n_rows: usize, ratio: f64) -> usize {
    ((n_rows as f64 * ratio).round() as usize).max(1)
}

/// Per-node candidate count for the forest: `max(1, floor(sqrt(d)))`.
#[inline]
pub fn sqrt_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().floor() as usize).max(1)
}

/// Per-node candidate count from a ratio: `max(1, floor(d * ratio))`, at most `d`.
#[inline]
pub fn ratio_features(n_features: usize, ratio: f64) -> usize {
    ((n_features as f64 * ratio).floor() as usize).clamp(1, n_features.max(1))
}

/// `size` row indices from `0..n_rows`, drawn with replacement.
pub fn bootstrap<R: Rng>(n_rows: usize, size: usize, rng: &mut R) -> Vec<usize> {
    (0..size).map(|_| rng.gen_range(0..n_rows)).collect()
}

/// `k` distinct features from `0..n_features`, in the random order drawn.
///
/// Partial Fisher-Yates shuffle; `k` is capped at `n_features`.
pub fn sample_features<R: Rng>(n_features: usize, k: usize, rng: &mut R) -> Vec<usize> {
    let k = k.min(n_features);
    let mut indices: Vec<usize> = (0..n_features).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n_features);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}
