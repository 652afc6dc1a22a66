//! Boosting objectives: gradients and Hessians of the classification losses.
//!
//! Scores use the same column-major layout as [`Gradients`]:
//! `scores[output * n_samples + sample]`.

use super::Gradients;
use crate::repr::network::{sigmoid, softmax_inplace};

/// Loss whose first and second derivatives drive tree growth.
pub trait ObjectiveFn: Send + Sync {
    /// Score outputs per sample.
    fn n_outputs(&self) -> usize;

    /// Initial score of every output.
    fn base_score(&self) -> f64;

    /// Fill `grads` from current `scores` and target class indices.
    fn compute_gradients(&self, scores: &[f64], classes: &[usize], grads: &mut Gradients);
}

// =============================================================================
// Logistic Loss
// =============================================================================

/// Binary cross-entropy on one log-odds output. Class index 1 is positive.
///
/// - Gradient: `σ(score) - y`
/// - Hessian: `σ(score) * (1 - σ(score))`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl ObjectiveFn for LogisticLoss {
    fn n_outputs(&self) -> usize {
        1
    }

    fn base_score(&self) -> f64 {
        1.0
    }

    fn compute_gradients(&self, scores: &[f64], classes: &[usize], grads: &mut Gradients) {
        debug_assert_eq!(scores.len(), classes.len());
        for (i, (&score, &class)) in scores.iter().zip(classes).enumerate() {
            let p = sigmoid(score);
            let y = if class == 1 { 1.0 } else { 0.0 };
            grads.set(i, 0, p - y, p * (1.0 - p));
        }
    }
}

// =============================================================================
// Softmax Loss
// =============================================================================

/// Multiclass cross-entropy over `n_classes` score outputs.
///
/// - Gradient: `p_k - 1{k = y}`
/// - Hessian: `2 * p_k * (1 - p_k)`
#[derive(Debug, Clone, Copy)]
pub struct SoftmaxLoss {
    pub n_classes: usize,
}

impl SoftmaxLoss {
    pub fn new(n_classes: usize) -> Self {
        Self { n_classes }
    }
}

impl ObjectiveFn for SoftmaxLoss {
    fn n_outputs(&self) -> usize {
        self.n_classes
    }

    fn base_score(&self) -> f64 {
        0.0
    }

    fn compute_gradients(&self, scores: &[f64], classes: &[usize], grads: &mut Gradients) {
        let n_samples = classes.len();
        let k = self.n_classes;
        debug_assert_eq!(scores.len(), n_samples * k);

        let mut row = vec![0.0; k];
        for (i, &class) in classes.iter().enumerate() {
            for (out, p) in row.iter_mut().enumerate() {
                *p = scores[out * n_samples + i];
            }
            softmax_inplace(&mut row);
            for (out, &p) in row.iter().enumerate() {
                let y = if out == class { 1.0 } else { 0.0 };
                grads.set(i, out, p - y, 2.0 * p * (1.0 - p));
            }
        }
    }
}
