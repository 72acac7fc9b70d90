//! Classifier Crate
//!
//! Feed-forward binary classifier trained with mini-batch Adam and early
//! stopping on a held-out validation tail.
//!
//! The network is `[Dense -> ReLU -> BatchNorm -> Dropout] x N -> Dense(1) -> sigmoid`,
//! sized by [`ClassifierConfig`]. Training returns the best-validation
//! weights along with a [`TrainingReport`].

pub mod config;
pub mod error;
mod layers;
pub mod metrics;
pub mod model;
mod network;
pub mod scorer;

pub use config::ClassifierConfig;
pub use error::{ClassifierError, Result};
pub use metrics::roc_auc;
pub use model::{Classifier, TrainingReport};
pub use scorer::Scorer;
