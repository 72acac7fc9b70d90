//! Declarative network and training configuration.

use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};

/// Shape of the network and the training schedule.
///
/// Every hidden layer is `Dense -> ReLU -> [BatchNorm] -> Dropout`, and the
/// stack ends in a single sigmoid unit. Defaults reproduce the demo network:
/// four hidden layers of 256/128/64/32 units, dropout 0.5, Adam at 1e-3,
/// 50 epochs of batch 64, a 20% validation tail and patience 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Units per hidden layer, input side first
    pub hidden_layers: Vec<usize>,
    /// Fraction of activations zeroed during training, in `[0, 1)`
    pub dropout: f32,
    /// Insert batch normalization after each hidden activation
    pub batch_norm: bool,
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of rows, taken from the end, held out for early stopping
    pub validation_split: f32,
    /// Epochs without validation-loss improvement before stopping
    pub patience: usize,
    /// Fixed RNG seed for weight init, shuffling and dropout
    pub seed: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![256, 128, 64, 32],
            dropout: 0.5,
            batch_norm: true,
            learning_rate: 0.001,
            epochs: 50,
            batch_size: 64,
            validation_split: 0.2,
            patience: 5,
            seed: None,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.hidden_layers.iter().position(|&w| w == 0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "hidden layer {pos} has zero units"
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(ClassifierError::InvalidConfig(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ClassifierError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(ClassifierError::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(ClassifierError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !(self.validation_split > 0.0 && self.validation_split < 1.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "validation_split must be in (0, 1), got {}",
                self.validation_split
            )));
        }
        Ok(())
    }
}
