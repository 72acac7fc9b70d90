//! Error types for the recommendation pipeline.

use classifier::ClassifierError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Filter(#[from] anyhow::Error),

    #[error("Scoring failed: {0}")]
    Scoring(#[from] ClassifierError),

    #[error("Scorer returned {found} scores for {expected} rows")]
    ScoreCountMismatch { expected: usize, found: usize },

    #[error("Scorer expects {scorer} feature columns but the dataset has {dataset}")]
    WidthMismatch { scorer: usize, dataset: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
