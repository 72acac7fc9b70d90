//! Error types for training and scoring.

use thiserror::Error;

/// Errors raised before or during training, or when scoring with a
/// matrix of the wrong shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Feature matrix has zero columns")]
    EmptyFeatures,

    #[error("Feature matrix has {features} rows but {labels} labels were given")]
    RowCountMismatch { features: usize, labels: usize },

    #[error("Label at row {row} is {value}; labels must be 0 or 1")]
    InvalidLabel { row: usize, value: u8 },

    #[error("Invalid classifier config: {0}")]
    InvalidConfig(String),

    #[error("Validation split {split} leaves no training rows out of {rows}")]
    EmptyTrainingSplit { rows: usize, split: f32 },

    #[error("No finite validation loss after {epochs} epochs")]
    NonFiniteLoss { epochs: usize },

    #[error("Expected {expected} feature columns, got {found}")]
    WidthMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
