//! Split criteria for greedy tree growth.
//!
//! Both criteria evaluate every observed value of every candidate feature as
//! a threshold (`x <= threshold` goes left) and keep a running best:
//! candidates are visited feature by feature, and within a feature in node
//! order, and a candidate replaces the best only on strict improvement. Equal
//! scores therefore resolve to the earliest candidate.
//!
//! Per feature, scores are computed once per distinct value with a sorted
//! sweep and then looked up in node order.

use ndarray::ArrayView2;

use crate::data::LabelSet;
use crate::repr::{ClassLeaf, LeafValue, ScalarLeaf};
use crate::utils::majority_vote;

/// Chosen split of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    pub feature: usize,
    pub threshold: f64,
    /// Criterion value of the split (impurity or gain).
    pub score: f64,
}

/// Scores candidate splits and produces leaf values.
pub trait SplitCriterion: Sync {
    type Leaf: LeafValue;

    /// Best split of `rows` among `candidates`, or `None` if no split beats
    /// the node's baseline with two non-empty sides.
    fn find_split(
        &self,
        x: ArrayView2<'_, f64>,
        rows: &[usize],
        candidates: &[usize],
    ) -> Option<SplitInfo>;

    /// Terminal value for `rows`.
    fn leaf(&self, rows: &[usize]) -> Self::Leaf;
}

/// Score of every distinct value of one feature, ascending by value.
struct ThresholdScore {
    value: f64,
    score: f64,
    n_left: usize,
}

fn sort_by_feature(x: ArrayView2<'_, f64>, rows: &[usize], feature: usize) -> Vec<usize> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
    sorted
}

fn lookup(scores: &[ThresholdScore], value: f64) -> &ThresholdScore {
    let idx = scores.partition_point(|s| s.value < value);
    &scores[idx]
}

// =============================================================================
// Gini
// =============================================================================

/// Gini impurity `1 - Σ p_c²` of a class histogram.
#[inline]
pub fn gini_impurity(counts: &[usize], size: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    let n = size as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Size-weighted Gini of a two-way partition; empty sides contribute 0.
#[inline]
pub fn weighted_gini(left: &[usize], n_left: usize, right: &[usize], n_right: usize) -> f64 {
    let total = (n_left + n_right) as f64;
    if total == 0.0 {
        return 0.0;
    }
    gini_impurity(left, n_left) * (n_left as f64 / total)
        + gini_impurity(right, n_right) * (n_right as f64 / total)
}

/// Classification criterion for forest trees.
///
/// The baseline is the node's own impurity, so a pure node never splits.
/// Leaves hold the majority label, ties going to the label encountered first
/// in node order.
#[derive(Debug, Clone, Copy)]
pub struct GiniCriterion<'a> {
    classes: &'a [usize],
    label_set: &'a LabelSet,
}

impl<'a> GiniCriterion<'a> {
    pub fn new(classes: &'a [usize], label_set: &'a LabelSet) -> Self {
        Self { classes, label_set }
    }

    fn histogram(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.label_set.len()];
        for &r in rows {
            counts[self.classes[r]] += 1;
        }
        counts
    }

    fn threshold_scores(
        &self,
        x: ArrayView2<'_, f64>,
        rows: &[usize],
        feature: usize,
        total: &[usize],
    ) -> Vec<ThresholdScore> {
        let n = rows.len();
        let sorted = sort_by_feature(x, rows, feature);

        let mut left = vec![0usize; total.len()];
        let mut right = vec![0usize; total.len()];
        let mut scores = Vec::new();

        for (pos, &row) in sorted.iter().enumerate() {
            left[self.classes[row]] += 1;
            let value = x[[row, feature]];
            let last_of_value = sorted
                .get(pos + 1)
                .map_or(true, |&next| x[[next, feature]] != value);
            if last_of_value {
                let n_left = pos + 1;
                for ((r, &t), &l) in right.iter_mut().zip(total).zip(&left) {
                    *r = t - l;
                }
                scores.push(ThresholdScore {
                    value,
                    score: weighted_gini(&left, n_left, &right, n - n_left),
                    n_left,
                });
            }
        }
        scores
    }
}

impl SplitCriterion for GiniCriterion<'_> {
    type Leaf = ClassLeaf;

    fn find_split(
        &self,
        x: ArrayView2<'_, f64>,
        rows: &[usize],
        candidates: &[usize],
    ) -> Option<SplitInfo> {
        let n = rows.len();
        let total = self.histogram(rows);
        let mut best_score = gini_impurity(&total, n);
        let mut best = None;

        for &feature in candidates {
            let scores = self.threshold_scores(x, rows, feature, &total);
            for &row in rows {
                let threshold = x[[row, feature]];
                let candidate = lookup(&scores, threshold);
                if candidate.n_left == n {
                    continue;
                }
                if candidate.score < best_score {
                    best_score = candidate.score;
                    best = Some(SplitInfo {
                        feature,
                        threshold,
                        score: candidate.score,
                    });
                }
            }
        }
        best
    }

    fn leaf(&self, rows: &[usize]) -> ClassLeaf {
        let class = majority_vote(rows.iter().map(|&r| self.classes[r] as u32)).unwrap_or(0);
        ClassLeaf(self.label_set.label(class as usize))
    }
}

// =============================================================================
// Regularized gain
// =============================================================================

/// Regularization of the second-order gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainParams {
    /// L2 penalty on leaf values (λ).
    pub lambda: f64,
    /// Minimum gain to make a split worthwhile (γ), subtracted from every gain.
    pub gamma: f64,
}

impl GainParams {
    #[inline]
    fn side_term(&self, g: f64, h: f64, n: usize) -> f64 {
        let denom = h + self.lambda;
        if n == 0 || denom == 0.0 {
            0.0
        } else {
            g * g / denom
        }
    }

    /// `0.5 * (G_L²/(H_L+λ) + G_R²/(H_R+λ) - (G_L+G_R)²/(H_L+H_R+λ)) - γ`.
    #[inline]
    pub fn gain(&self, (gl, hl, nl): (f64, f64, usize), (gr, hr, nr): (f64, f64, usize)) -> f64 {
        0.5 * (self.side_term(gl, hl, nl) + self.side_term(gr, hr, nr)
            - self.side_term(gl + gr, hl + hr, nl + nr))
            - self.gamma
    }

    /// Optimal leaf weight `-G / (H + λ)`, 0 when the denominator vanishes.
    #[inline]
    pub fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.lambda;
        if denom == 0.0 { 0.0 } else { -g / denom }
    }
}

/// Second-order criterion for boosted regression trees.
///
/// The running best starts at `-∞`. When the best candidate leaves one side
/// empty the node is not split.
#[derive(Debug, Clone, Copy)]
pub struct GainCriterion<'a> {
    grads: &'a [f64],
    hess: &'a [f64],
    params: GainParams,
}

impl<'a> GainCriterion<'a> {
    pub fn new(grads: &'a [f64], hess: &'a [f64], params: GainParams) -> Self {
        debug_assert_eq!(grads.len(), hess.len());
        Self {
            grads,
            hess,
            params,
        }
    }

    fn totals(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter()
            .fold((0.0, 0.0), |(g, h), &r| (g + self.grads[r], h + self.hess[r]))
    }

    fn threshold_scores(
        &self,
        x: ArrayView2<'_, f64>,
        rows: &[usize],
        feature: usize,
        (g_total, h_total): (f64, f64),
    ) -> Vec<ThresholdScore> {
        let n = rows.len();
        let sorted = sort_by_feature(x, rows, feature);

        let (mut gl, mut hl) = (0.0, 0.0);
        let mut scores = Vec::new();

        for (pos, &row) in sorted.iter().enumerate() {
            gl += self.grads[row];
            hl += self.hess[row];
            let value = x[[row, feature]];
            let last_of_value = sorted
                .get(pos + 1)
                .map_or(true, |&next| x[[next, feature]] != value);
            if last_of_value {
                let n_left = pos + 1;
                let score = self.params.gain(
                    (gl, hl, n_left),
                    (g_total - gl, h_total - hl, n - n_left),
                );
                scores.push(ThresholdScore {
                    value,
                    score,
                    n_left,
                });
            }
        }
        scores
    }
}

impl SplitCriterion for GainCriterion<'_> {
    type Leaf = ScalarLeaf;

    fn find_split(
        &self,
        x: ArrayView2<'_, f64>,
        rows: &[usize],
        candidates: &[usize],
    ) -> Option<SplitInfo> {
        let n = rows.len();
        let totals = self.totals(rows);
        let mut best_score = f64::NEG_INFINITY;
        let mut best = None;

        for &feature in candidates {
            let scores = self.threshold_scores(x, rows, feature, totals);
            for &row in rows {
                let threshold = x[[row, feature]];
                let candidate = lookup(&scores, threshold);
                if candidate.score > best_score {
                    best_score = candidate.score;
                    best = (candidate.n_left < n).then(|| SplitInfo {
                        feature,
                        threshold,
                        score: candidate.score,
                    });
                }
            }
        }
        best
    }

    fn leaf(&self, rows: &[usize]) -> ScalarLeaf {
        let (g, h) = self.totals(rows);
        ScalarLeaf(self.params.leaf_weight(g, h))
    }
}
