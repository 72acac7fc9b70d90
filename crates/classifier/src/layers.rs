//! Layers of the feed-forward network.
//!
//! Each layer keeps what its backward pass needs from the most recent
//! training forward pass. `infer` never touches those caches, so a trained
//! network can be shared read-only.

use ndarray::{Array, Array1, Array2, Axis, Dimension, Ix1, Ix2, Zip};
use rand::Rng;
use rand::rngs::StdRng;

/// Keras defaults for batch normalization
const BN_MOMENTUM: f32 = 0.99;
const BN_EPSILON: f32 = 1e-3;

/// Adam hyperparameters plus the shared step counter
#[derive(Debug, Clone)]
pub(crate) struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: i32,
}

impl Adam {
    pub(crate) fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
        }
    }

    /// Advance the step counter; call once per batch before updating params
    pub(crate) fn tick(&mut self) {
        self.t += 1;
    }

    fn update<D: Dimension>(&self, param: &mut Param<D>) {
        let (b1, b2) = (self.beta1, self.beta2);
        let m_correction = 1.0 - b1.powi(self.t);
        let v_correction = 1.0 - b2.powi(self.t);
        let (lr, eps) = (self.learning_rate, self.epsilon);

        Zip::from(&mut param.value)
            .and(&mut param.m)
            .and(&mut param.v)
            .and(&param.grad)
            .for_each(|w, m, v, &g| {
                *m = b1 * *m + (1.0 - b1) * g;
                *v = b2 * *v + (1.0 - b2) * g * g;
                let m_hat = *m / m_correction;
                let v_hat = *v / v_correction;
                *w -= lr * m_hat / (v_hat.sqrt() + eps);
            });
    }
}

/// A trainable tensor with its gradient and Adam moments
#[derive(Debug, Clone)]
pub(crate) struct Param<D: Dimension> {
    pub(crate) value: Array<f32, D>,
    grad: Array<f32, D>,
    m: Array<f32, D>,
    v: Array<f32, D>,
}

impl<D: Dimension> Param<D> {
    fn new(value: Array<f32, D>) -> Self {
        let zeros = Array::zeros(value.raw_dim());
        Self {
            grad: zeros.clone(),
            m: zeros.clone(),
            v: zeros,
            value,
        }
    }
}

// =============================================================================
// Dense
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct Dense {
    pub(crate) weights: Param<Ix2>,
    pub(crate) bias: Param<Ix1>,
    input: Array2<f32>,
}

impl Dense {
    /// Glorot-uniform weights, zero bias
    pub(crate) fn new(fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Self {
        let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
        let weights = Array2::from_shape_fn((fan_in, fan_out), |_| rng.random_range(-limit..limit));
        Self {
            weights: Param::new(weights),
            bias: Param::new(Array1::zeros(fan_out)),
            input: Array2::zeros((0, fan_in)),
        }
    }

    fn forward_train(&mut self, x: Array2<f32>) -> Array2<f32> {
        let out = self.infer(x.view());
        self.input = x;
        out
    }

    fn infer(&self, x: ndarray::ArrayView2<'_, f32>) -> Array2<f32> {
        x.dot(&self.weights.value) + &self.bias.value
    }

    fn backward(&mut self, grad: Array2<f32>) -> Array2<f32> {
        self.weights.grad = self.input.t().dot(&grad);
        self.bias.grad = grad.sum_axis(Axis(0));
        grad.dot(&self.weights.value.t())
    }
}

// =============================================================================
// Batch normalization
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct BatchNorm {
    gamma: Param<Ix1>,
    beta: Param<Ix1>,
    running_mean: Array1<f32>,
    running_var: Array1<f32>,
    x_hat: Array2<f32>,
    inv_std: Array1<f32>,
}

impl BatchNorm {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            gamma: Param::new(Array1::ones(width)),
            beta: Param::new(Array1::zeros(width)),
            running_mean: Array1::zeros(width),
            running_var: Array1::ones(width),
            x_hat: Array2::zeros((0, width)),
            inv_std: Array1::ones(width),
        }
    }

    fn forward_train(&mut self, x: Array2<f32>) -> Array2<f32> {
        let width = x.ncols();
        let mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(width));
        let centered = &x - &mean;
        let var = centered
            .mapv(|c| c * c)
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(width));

        self.inv_std = var.mapv(|v| 1.0 / (v + BN_EPSILON).sqrt());
        self.x_hat = &centered * &self.inv_std;

        self.running_mean = &self.running_mean * BN_MOMENTUM + &mean * (1.0 - BN_MOMENTUM);
        self.running_var = &self.running_var * BN_MOMENTUM + &var * (1.0 - BN_MOMENTUM);

        &self.x_hat * &self.gamma.value + &self.beta.value
    }

    fn infer(&self, x: Array2<f32>) -> Array2<f32> {
        let inv_std = self.running_var.mapv(|v| 1.0 / (v + BN_EPSILON).sqrt());
        (x - &self.running_mean) * &inv_std * &self.gamma.value + &self.beta.value
    }

    fn backward(&mut self, grad: Array2<f32>) -> Array2<f32> {
        let n = grad.nrows() as f32;
        self.gamma.grad = (&grad * &self.x_hat).sum_axis(Axis(0));
        self.beta.grad = grad.sum_axis(Axis(0));

        let dx_hat = &grad * &self.gamma.value;
        let sum_dx_hat = dx_hat.sum_axis(Axis(0));
        let sum_dx_hat_x_hat = (&dx_hat * &self.x_hat).sum_axis(Axis(0));

        let scaled = dx_hat * n - &sum_dx_hat - &self.x_hat * &sum_dx_hat_x_hat;
        scaled * &(&self.inv_std / n)
    }
}

// =============================================================================
// Activation and regularization
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct Relu {
    mask: Array2<f32>,
}

impl Relu {
    fn forward_train(&mut self, x: Array2<f32>) -> Array2<f32> {
        self.mask = x.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
        x * &self.mask
    }

    fn infer(x: Array2<f32>) -> Array2<f32> {
        x.mapv_into(|v| v.max(0.0))
    }

    fn backward(&self, grad: Array2<f32>) -> Array2<f32> {
        grad * &self.mask
    }
}

/// Inverted dropout: kept activations are scaled by `1 / (1 - rate)` during
/// training so inference is a plain pass-through.
#[derive(Debug, Clone)]
pub(crate) struct Dropout {
    rate: f32,
    mask: Array2<f32>,
}

impl Dropout {
    fn forward_train(&mut self, x: Array2<f32>, rng: &mut StdRng) -> Array2<f32> {
        let keep = 1.0 - self.rate;
        self.mask = Array2::from_shape_fn(x.raw_dim(), |_| {
            if rng.random::<f32>() < keep { 1.0 / keep } else { 0.0 }
        });
        x * &self.mask
    }

    fn backward(&self, grad: Array2<f32>) -> Array2<f32> {
        grad * &self.mask
    }
}

// =============================================================================
// Layer
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) enum Layer {
    Dense(Dense),
    Relu(Relu),
    BatchNorm(BatchNorm),
    Dropout(Dropout),
}

impl Layer {
    pub(crate) fn dense(fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Self {
        Layer::Dense(Dense::new(fan_in, fan_out, rng))
    }

    pub(crate) fn relu() -> Self {
        Layer::Relu(Relu { mask: Array2::zeros((0, 0)) })
    }

    pub(crate) fn batch_norm(width: usize) -> Self {
        Layer::BatchNorm(BatchNorm::new(width))
    }

    pub(crate) fn dropout(rate: f32) -> Self {
        Layer::Dropout(Dropout { rate, mask: Array2::zeros((0, 0)) })
    }

    pub(crate) fn forward_train(&mut self, x: Array2<f32>, rng: &mut StdRng) -> Array2<f32> {
        match self {
            Layer::Dense(l) => l.forward_train(x),
            Layer::Relu(l) => l.forward_train(x),
            Layer::BatchNorm(l) => l.forward_train(x),
            Layer::Dropout(l) => l.forward_train(x, rng),
        }
    }

    pub(crate) fn infer(&self, x: Array2<f32>) -> Array2<f32> {
        match self {
            Layer::Dense(l) => l.infer(x.view()),
            Layer::Relu(_) => Relu::infer(x),
            Layer::BatchNorm(l) => l.infer(x),
            Layer::Dropout(_) => x,
        }
    }

    pub(crate) fn backward(&mut self, grad: Array2<f32>) -> Array2<f32> {
        match self {
            Layer::Dense(l) => l.backward(grad),
            Layer::Relu(l) => l.backward(grad),
            Layer::BatchNorm(l) => l.backward(grad),
            Layer::Dropout(l) => l.backward(grad),
        }
    }

    pub(crate) fn apply_gradients(&mut self, adam: &Adam) {
        match self {
            Layer::Dense(l) => {
                adam.update(&mut l.weights);
                adam.update(&mut l.bias);
            }
            Layer::BatchNorm(l) => {
                adam.update(&mut l.gamma);
                adam.update(&mut l.beta);
            }
            Layer::Relu(_) | Layer::Dropout(_) => {}
        }
    }
}
