//! Layer stack assembled from a [`ClassifierConfig`].

use crate::config::ClassifierConfig;
use crate::layers::{Adam, Layer};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use rand::rngs::StdRng;

/// `hidden blocks -> Dense(1)`; the final sigmoid lives in [`sigmoid`] and
/// in the loss so the network itself outputs logits.
#[derive(Debug, Clone)]
pub(crate) struct Network {
    layers: Vec<Layer>,
    input_width: usize,
}

impl Network {
    pub(crate) fn new(input_width: usize, config: &ClassifierConfig, rng: &mut StdRng) -> Self {
        let mut layers = Vec::new();
        let mut fan_in = input_width;

        for &units in &config.hidden_layers {
            layers.push(Layer::dense(fan_in, units, rng));
            layers.push(Layer::relu());
            if config.batch_norm {
                layers.push(Layer::batch_norm(units));
            }
            if config.dropout > 0.0 {
                layers.push(Layer::dropout(config.dropout));
            }
            fan_in = units;
        }
        layers.push(Layer::dense(fan_in, 1, rng));

        Self { layers, input_width }
    }

    pub(crate) fn input_width(&self) -> usize {
        self.input_width
    }

    /// Training-mode forward pass; returns logits of shape `(rows, 1)`
    pub(crate) fn forward_train(&mut self, x: Array2<f32>, rng: &mut StdRng) -> Array2<f32> {
        self.layers
            .iter_mut()
            .fold(x, |acc, layer| layer.forward_train(acc, rng))
    }

    pub(crate) fn backward(&mut self, grad_logits: Array2<f32>) {
        self.layers
            .iter_mut()
            .rev()
            .fold(grad_logits, |grad, layer| layer.backward(grad));
    }

    pub(crate) fn apply_gradients(&mut self, adam: &mut Adam) {
        adam.tick();
        for layer in &mut self.layers {
            layer.apply_gradients(adam);
        }
    }

    /// Inference-mode logits, one per row
    pub(crate) fn logits(&self, x: ArrayView2<'_, f32>) -> Array1<f32> {
        let out = self
            .layers
            .iter()
            .fold(x.to_owned(), |acc, layer| layer.infer(acc));
        out.column(0).to_owned()
    }

    /// Probabilities in `[0, 1]`, one per row
    pub(crate) fn predict(&self, x: ArrayView2<'_, f32>) -> Array1<f32> {
        self.logits(x).mapv_into(sigmoid)
    }
}

pub(crate) fn sigmoid(z: f32) -> f32 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Mean binary cross-entropy computed from logits (numerically stable form)
pub(crate) fn bce_from_logits(logits: ArrayView1<'_, f32>, targets: ArrayView1<'_, f32>) -> f32 {
    if logits.is_empty() {
        return 0.0;
    }
    let total = Zip::from(&logits)
        .and(&targets)
        .fold(0.0_f32, |acc, &z, &y| {
            acc + z.max(0.0) - z * y + (-z.abs()).exp().ln_1p()
        });
    total / logits.len() as f32
}

/// d(mean BCE)/d(logit), shaped `(rows, 1)` for the output layer
pub(crate) fn bce_gradient(logits: ArrayView1<'_, f32>, targets: ArrayView1<'_, f32>) -> Array2<f32> {
    let n = logits.len().max(1) as f32;
    let grad = Zip::from(&logits)
        .and(&targets)
        .map_collect(|&z, &y| (sigmoid(z) - y) / n);
    grad.insert_axis(ndarray::Axis(1))
}
