//! Loss and backpropagation for the feed-forward network.

use ndarray::{Array2, ArrayView2, Axis};

use super::metrics::{binary_log_loss, categorical_log_loss};
use crate::repr::network::relu_derivative;
use crate::repr::{LayerUpdate, Network, OutputActivation};

/// Batch loss: cross-entropy of `output` against one-hot `targets`, plus the
/// L2 penalty `0.5 * alpha * Σ w² / batch_len`.
///
/// Logistic outputs use the binary cross-entropy summed over all output
/// units; softmax outputs use the categorical cross-entropy. Both are
/// averaged over the batch.
pub fn batch_loss(
    network: &Network,
    output: ArrayView2<'_, f64>,
    targets: ArrayView2<'_, f64>,
    alpha: f64,
) -> f64 {
    let batch_len = output.nrows() as f64;
    let data_loss = match network.output_activation() {
        OutputActivation::Logistic => binary_log_loss(output, targets),
        OutputActivation::Softmax => categorical_log_loss(output, targets),
    };
    data_loss + 0.5 * alpha * network.squared_weight_sum() / batch_len
}

/// Gradients of [`batch_loss`] for every layer.
///
/// `activations` is the result of [`Network::forward`] on `input`. The output
/// error is `A - Y` for both output activations; hidden errors propagate as
/// `(δ · Wᵀ) ⊙ ReLU'(A)`. Weight gradients are `(A_prevᵀ · δ + αW) / n` and
/// bias gradients `mean(δ)`.
pub fn backward(
    network: &Network,
    input: ArrayView2<'_, f64>,
    activations: &[Array2<f64>],
    targets: ArrayView2<'_, f64>,
    alpha: f64,
) -> Vec<LayerUpdate> {
    let layers = network.layers();
    debug_assert_eq!(layers.len(), activations.len());
    let batch_len = input.nrows() as f64;

    let mut grads: Vec<LayerUpdate> = Vec::with_capacity(layers.len());
    let Some(output) = activations.last() else {
        return grads;
    };
    let mut delta = output - &targets;

    for i in (0..layers.len()).rev() {
        let prev_t_delta = if i == 0 {
            input.t().dot(&delta)
        } else {
            activations[i - 1].t().dot(&delta)
        };

        let weights = (prev_t_delta + &(&layers[i].weights * alpha)) / batch_len;
        let bias = delta.mean_axis(Axis(0)).unwrap_or_else(|| layers[i].bias.clone());
        grads.push(LayerUpdate { weights, bias });

        if i > 0 {
            let mut next = delta.dot(&layers[i].weights.t());
            next.zip_mut_with(&activations[i - 1], |d, &a| *d *= relu_derivative(a));
            delta = next;
        }
    }

    grads.reverse();
    grads
}
