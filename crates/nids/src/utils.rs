//! Common utilities used across the crate.
//!
//! Parallelism configuration, thread pool setup, and small vote/argmax helpers
//! shared by the ensembles and the network.

use std::num::NonZeroUsize;

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through training and prediction components.
/// When `Parallel`, components may use `rayon` parallel iterators; when
/// `Sequential`, they must iterate in order on the calling thread.
///
/// The thread pool itself is set up at the classifier level via `n_threads`.
/// Components never manage pools, they just respect this flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - `None` = auto (parallel if the rayon pool has multiple threads)
    /// - `Some(1)` = sequential
    /// - `Some(n > 1)` = parallel
    #[inline]
    pub fn from_threads(n_threads: Option<NonZeroUsize>) -> Self {
        match n_threads.map(NonZeroUsize::get) {
            Some(1) => Parallelism::Sequential,
            None if rayon::current_num_threads() == 1 => Parallelism::Sequential,
            _ => Parallelism::Parallel,
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map over `iter`, collecting results in input order.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }

    /// Fallible map; the first error (in input order when sequential) wins.
    #[inline]
    pub fn maybe_par_try_map<T, B, E, I, F>(self, iter: I, f: F) -> Result<Vec<B>, E>
    where
        T: Send,
        B: Send,
        E: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> Result<B, E> + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `None` = auto (use the global rayon pool)
/// - `Some(1)` = sequential (no thread pool)
/// - `Some(n)` = use exactly `n` threads
///
/// If a dedicated pool cannot be created the closure runs on the global pool,
/// which changes scheduling but never results.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use nids::run_with_threads;
///
/// let seq = run_with_threads(NonZeroUsize::new(1), |par| par.is_parallel());
/// assert!(!seq);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(
    n_threads: Option<NonZeroUsize>,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    match (parallelism, n_threads) {
        (Parallelism::Sequential, _) => f(Parallelism::Sequential),
        (Parallelism::Parallel, None) => f(Parallelism::Parallel),
        (Parallelism::Parallel, Some(n)) => {
            match rayon::ThreadPoolBuilder::new().num_threads(n.get()).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    tracing::warn!(threads = n.get(), %err, "falling back to the global thread pool");
                    f(Parallelism::Parallel)
                }
            }
        }
    }
}

// =============================================================================
// Vote Utilities
// =============================================================================

/// Most frequent value; ties go to the value encountered first.
///
/// Returns `None` for an empty input.
pub fn majority_vote<I>(votes: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    // (label, count) in first-encounter order. Label sets are small.
    let mut tally: Vec<(u32, usize)> = Vec::new();
    for vote in votes {
        match tally.iter_mut().find(|(label, _)| *label == vote) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote, 1)),
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for &(label, count) in &tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

/// Index of the largest value; ties go to the lowest index.
#[inline]
pub fn argmax(values: impl IntoIterator<Item = f64>) -> usize {
    let mut best_idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, v) in values.into_iter().enumerate() {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threads(n: usize) -> Option<NonZeroUsize> {
        NonZeroUsize::new(n)
    }

    #[test]
    fn test_parallelism_from_threads() {
        assert!(!Parallelism::from_threads(threads(1)).is_parallel());
        assert!(Parallelism::from_threads(threads(2)).is_parallel());
        assert!(Parallelism::from_threads(threads(8)).is_parallel());
    }

    #[test]
    fn test_run_with_threads_sequential() {
        let result = run_with_threads(threads(1), |par| (par, 42));
        assert_eq!(result, (Parallelism::Sequential, 42));
    }

    #[test]
    fn test_run_with_threads_explicit() {
        let result = run_with_threads(threads(2), |_| rayon::current_num_threads());
        assert_eq!(result, 2);
    }

    #[test]
    fn test_maybe_par_map_preserves_order() {
        let result = Parallelism::Sequential.maybe_par_map(0..5usize, |i| i * 2);
        assert_eq!(result, vec![0, 2, 4, 6, 8]);

        let result = Parallelism::Parallel.maybe_par_map(0..1000usize, |i| i * 2);
        assert!(result.iter().enumerate().all(|(i, &v)| v == i * 2));
    }

    #[test]
    fn test_maybe_par_try_map_propagates_error() {
        let result: Result<Vec<usize>, &str> =
            Parallelism::Sequential.maybe_par_try_map(0..5usize, |i| {
                if i == 3 { Err("three") } else { Ok(i) }
            });
        assert_eq!(result, Err("three"));
    }

    #[test]
    fn test_majority_vote_tie_goes_to_first_seen() {
        assert_eq!(majority_vote([2, 1, 1, 2]), Some(2));
        assert_eq!(majority_vote([1, 2, 2]), Some(2));
        assert_eq!(majority_vote([7]), Some(7));
        assert_eq!(majority_vote([]), None);
    }

    #[test]
    fn test_argmax_first_max() {
        assert_eq!(argmax([0.1, 0.7, 0.7, 0.2]), 1);
        assert_eq!(argmax([3.0]), 0);
    }
}
