//! Filter implementations for the recommendation pipeline.
//!
//! This module contains the concrete filters that can be composed
//! into a FilterPipeline.

pub mod genre;

// Re-export for convenience
pub use genre::GenreFilter;
