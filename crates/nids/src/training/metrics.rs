//! Evaluation metrics and cross-entropy losses.
//!
//! - [`accuracy`], [`f1_score`]: label-level quality of a prediction
//! - [`binary_log_loss`], [`categorical_log_loss`]: probability-level losses
//!   used while training the network

use ndarray::ArrayView2;

use crate::error::DataError;

/// Probabilities are clamped to `[EPS, 1 - EPS]` inside logarithms.
pub const EPS: f64 = 1e-15;

// =============================================================================
// Cross-entropy
// =============================================================================

/// Binary cross-entropy summed over output units, averaged over rows.
pub fn binary_log_loss(proba: ArrayView2<'_, f64>, targets: ArrayView2<'_, f64>) -> f64 {
    let n_rows = proba.nrows();
    if n_rows == 0 {
        return 0.0;
    }
    let total: f64 = proba
        .iter()
        .zip(targets.iter())
        .map(|(&p, &y)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / n_rows as f64
}

/// Categorical cross-entropy `-Σ y ln p`, averaged over rows.
pub fn categorical_log_loss(proba: ArrayView2<'_, f64>, targets: ArrayView2<'_, f64>) -> f64 {
    let n_rows = proba.nrows();
    if n_rows == 0 {
        return 0.0;
    }
    let total: f64 = proba
        .iter()
        .zip(targets.iter())
        .filter(|(_, y)| **y != 0.0)
        .map(|(&p, &y)| -y * p.clamp(EPS, 1.0 - EPS).ln())
        .sum();
    total / n_rows as f64
}

// =============================================================================
// Label metrics
// =============================================================================

/// How per-class F1 scores are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Average {
    /// Unweighted mean over classes.
    #[default]
    Macro,
    /// Mean weighted by each class's support in the ground truth.
    Weighted,
}

fn check_lengths(truth: &[u32], predicted: &[u32]) -> Result<(), DataError> {
    if truth.len() != predicted.len() {
        return Err(DataError::LengthMismatch {
            truth: truth.len(),
            predicted: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(())
}

/// Fraction of positions where `predicted` equals `truth`.
pub fn accuracy(truth: &[u32], predicted: &[u32]) -> Result<f64, DataError> {
    check_lengths(truth, predicted)?;
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// F1 score over the classes present in `truth`.
///
/// A class whose precision or recall is undefined (no predictions or no
/// support) contributes an F1 of 0.
pub fn f1_score(truth: &[u32], predicted: &[u32], average: Average) -> Result<f64, DataError> {
    check_lengths(truth, predicted)?;

    let mut classes: Vec<u32> = truth.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for &class in &classes {
        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t == class, p == class) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let f1 = if tp == 0 {
            0.0
        } else {
            let precision = tp as f64 / (tp + fp) as f64;
            let recall = tp as f64 / (tp + fn_) as f64;
            2.0 * precision * recall / (precision + recall)
        };

        let weight = match average {
            Average::Macro => 1.0,
            Average::Weighted => (tp + fn_) as f64,
        };
        weighted_sum += weight * f1;
        weight_total += weight;
    }

    Ok(weighted_sum / weight_total)
}
