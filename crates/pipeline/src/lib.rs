//! Pipeline for turning a genre selection into ranked, paginated rows.
//!
//! This crate provides:
//! - Filter trait and implementations for narrowing dataset rows
//! - FilterPipeline for composing filters
//! - Stable score ranking and caller-held pagination
//! - RecommendationEngine tying filter, scorer, ranking and paging together
//! - Window evaluation metrics
//!
//! ## Architecture
//! Each request runs the same stages:
//! 1. Filters keep the rows of the selected genre
//! 2. The classifier scores those rows' feature vectors
//! 3. Rows are ranked by descending score, ties by row index
//! 4. A PageCursor cuts out the requested page
//! 5. Metrics compare the page's true labels with its predictions
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{PageCursor, RecommendationEngine};
//!
//! let engine = RecommendationEngine::new(dataset.clone(), scorer.clone())?;
//! let mut cursor = PageCursor::new(5);
//!
//! let first = engine.window("Action", &cursor)?;
//! cursor.advance();
//! let second = engine.window("Action", &cursor)?;
//! ```

pub mod engine;
pub mod error;
pub mod evaluation;
pub mod filter_pipeline;
pub mod filters;
pub mod pagination;
pub mod ranking;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use engine::{RecommendationEngine, RecommendationWindow};
pub use error::{PipelineError, Result};
pub use evaluation::{EvaluationMode, Metrics, accuracy, f1_score, precision, recall};
pub use filter_pipeline::FilterPipeline;
pub use filters::GenreFilter;
pub use pagination::{DEFAULT_PAGE_SIZE, PageCursor};
pub use ranking::{RankedRow, rank_by_score};
pub use traits::Filter;
