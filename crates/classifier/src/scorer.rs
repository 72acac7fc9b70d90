//! Scoring seam between the trained model and the recommendation engine.

use crate::error::Result;
use ndarray::ArrayView2;

/// Anything that maps feature rows to a relevance score in `[0, 1]`.
///
/// The engine only depends on this trait, so tests can substitute a fixed
/// scorer for a trained network.
pub trait Scorer: Send + Sync {
    /// One score per row, in row order
    fn score(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>>;

    /// Number of feature columns this scorer expects
    fn input_width(&self) -> usize;
}
