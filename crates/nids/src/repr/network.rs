//! Layered weight/bias state of a feed-forward network.
//!
//! Layer `i` maps `[batch, fan_in]` to `[batch, fan_out]` as
//! `A_i = act(A_{i-1} · W_i + b_i)`. Hidden layers use ReLU; the output layer
//! uses the network's [`OutputActivation`].

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;

/// Activation of the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputActivation {
    /// Independent sigmoid per output unit.
    Logistic,
    /// Row-wise softmax over output units.
    Softmax,
}

/// One dense layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// `[fan_in, fan_out]`.
    pub weights: Array2<f64>,
    /// `[fan_out]`.
    pub bias: Array1<f64>,
}

impl Layer {
    #[inline]
    pub fn fan_in(&self) -> usize {
        self.weights.nrows()
    }

    #[inline]
    pub fn fan_out(&self) -> usize {
        self.weights.ncols()
    }
}

/// Parameter-shaped update (gradients or optimizer deltas) for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerUpdate {
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

impl LayerUpdate {
    pub fn zeros_like(layer: &Layer) -> Self {
        Self {
            weights: Array2::zeros(layer.weights.raw_dim()),
            bias: Array1::zeros(layer.bias.raw_dim()),
        }
    }
}

/// Dense feed-forward network.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    output: OutputActivation,
}

impl Network {
    /// Network with layer sizes `sizes = [d, hidden.., C]`.
    ///
    /// Weights and biases are drawn uniformly from
    /// `±sqrt(6 / (fan_in + fan_out))` (Glorot uniform).
    pub fn glorot<R: Rng>(sizes: &[usize], output: OutputActivation, rng: &mut R) -> Self {
        let layers = sizes
            .windows(2)
            .map(|w| {
                let (fan_in, fan_out) = (w[0], w[1]);
                let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
                let weights = Array2::from_shape_simple_fn((fan_in, fan_out), || {
                    rng.gen_range(-bound..bound)
                });
                let bias = Array1::from_shape_simple_fn(fan_out, || rng.gen_range(-bound..bound));
                Layer { weights, bias }
            })
            .collect();
        Self { layers, output }
    }

    /// Network from explicit layers.
    pub fn from_layers(layers: Vec<Layer>, output: OutputActivation) -> Self {
        Self { layers, output }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn output_activation(&self) -> OutputActivation {
        self.output
    }

    pub fn n_inputs(&self) -> usize {
        self.layers.first().map_or(0, Layer::fan_in)
    }

    pub fn n_outputs(&self) -> usize {
        self.layers.last().map_or(0, Layer::fan_out)
    }

    /// Activations of every layer for a batch, input excluded.
    ///
    /// The last entry is the output layer (probabilities).
    pub fn forward(&self, input: ArrayView2<'_, f64>) -> Vec<Array2<f64>> {
        let mut activations: Vec<Array2<f64>> = Vec::with_capacity(self.layers.len());
        let last = self.layers.len().saturating_sub(1);

        for (i, layer) in self.layers.iter().enumerate() {
            let mut z = match activations.last() {
                Some(prev) => prev.dot(&layer.weights),
                None => input.dot(&layer.weights),
            } + &layer.bias;
            if i == last {
                match self.output {
                    OutputActivation::Logistic => z.mapv_inplace(sigmoid),
                    OutputActivation::Softmax => softmax_rows(&mut z),
                }
            } else {
                z.mapv_inplace(relu);
            }
            activations.push(z);
        }
        activations
    }

    /// Output-layer probabilities `[batch, n_outputs]`.
    pub fn predict_proba(&self, input: ArrayView2<'_, f64>) -> Array2<f64> {
        self.forward(input)
            .pop()
            .unwrap_or_else(|| input.to_owned())
    }

    /// Add per-layer deltas to the parameters.
    pub fn apply(&mut self, deltas: &[LayerUpdate]) {
        debug_assert_eq!(deltas.len(), self.layers.len());
        for (layer, delta) in self.layers.iter_mut().zip(deltas) {
            layer.weights += &delta.weights;
            layer.bias += &delta.bias;
        }
    }

    /// `Σ w²` over all weight matrices (biases excluded).
    pub fn squared_weight_sum(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.weights.iter().map(|w| w * w).sum::<f64>())
            .sum()
    }
}

// =============================================================================
// Activations
// =============================================================================

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Derivative of ReLU expressed on its output: 1 for `a > 0`, else 0.
#[inline]
pub fn relu_derivative(activation: f64) -> f64 {
    if activation > 0.0 { 1.0 } else { 0.0 }
}

/// Numerically stable softmax of a single slice, in place.
pub fn softmax_inplace(row: &mut [f64]) {
    if row.is_empty() {
        return;
    }
    let max_val = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for x in row.iter_mut() {
        *x = (*x - max_val).exp();
        sum += *x;
    }
    if sum > 0.0 {
        for x in row.iter_mut() {
            *x /= sum;
        }
    }
}

fn softmax_rows(z: &mut Array2<f64>) {
    for mut row in z.axis_iter_mut(Axis(0)) {
        if let Some(slice) = row.as_slice_mut() {
            softmax_inplace(slice);
        } else {
            let mut owned = row.to_vec();
            softmax_inplace(&mut owned);
            row.iter_mut().zip(owned).for_each(|(dst, v)| *dst = v);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;

    #[test]
    fn glorot_respects_bounds_and_shapes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let net = Network::glorot(&[4, 8, 3], OutputActivation::Softmax, &mut rng);

        assert_eq!(net.layers().len(), 2);
        assert_eq!(net.n_inputs(), 4);
        assert_eq!(net.n_outputs(), 3);

        let bound = (6.0f64 / 12.0).sqrt();
        let first = &net.layers()[0];
        assert_eq!(first.weights.dim(), (4, 8));
        assert!(first.weights.iter().all(|w| w.abs() <= bound));
        assert!(first.bias.iter().all(|b| b.abs() <= bound));
    }

    #[test]
    fn forward_hand_computed() {
        // 2 -> 2 (relu) -> 1 (logistic)
        let hidden = Layer {
            weights: array![[1.0, -1.0], [0.5, 2.0]],
            bias: array![0.0, -1.0],
        };
        let output = Layer {
            weights: array![[1.0], [1.0]],
            bias: array![-1.0],
        };
        let net = Network::from_layers(vec![hidden, output], OutputActivation::Logistic);

        let x = array![[2.0, 1.0]];
        let acts = net.forward(x.view());
        // z1 = [2.5, -1.0] -> relu [2.5, 0.0]
        assert_abs_diff_eq!(acts[0][[0, 0]], 2.5);
        assert_abs_diff_eq!(acts[0][[0, 1]], 0.0);
        // z2 = 2.5 - 1.0 = 1.5
        assert_abs_diff_eq!(acts[1][[0, 0]], sigmoid(1.5), epsilon = 1e-12);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let net = Network::glorot(&[3, 5, 4], OutputActivation::Softmax, &mut rng);
        let x = array![[0.1, 0.2, 0.3], [10.0, -3.0, 0.5]];
        let proba = net.predict_proba(x.view());
        for row in proba.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn softmax_is_stable_for_large_logits() {
        let mut row = [1000.0, 1000.0];
        softmax_inplace(&mut row);
        assert_abs_diff_eq!(row[0], 0.5);
    }

    #[test]
    fn relu_derivative_is_standard() {
        assert_eq!(relu_derivative(0.3), 1.0);
        assert_eq!(relu_derivative(0.0), 0.0);
    }
}
