//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a set of dataset rows.

use anyhow::Result;
use data_loader::{Dataset, RowIndex};

/// Core trait for narrowing a set of dataset rows.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across threads
/// - Filters take ownership of the row list and return the rows they keep
/// - Rows are indices into the dataset, so records, features and labels
///   stay aligned through every filter
/// - Kept rows must stay in their input order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of rows.
    ///
    /// # Arguments
    /// * `rows` - Row indices into `dataset` (takes ownership)
    /// * `dataset` - The loaded dataset the rows point into
    ///
    /// # Returns
    /// * `Ok(Vec<RowIndex>)` - The rows that passed, in input order
    /// * `Err` - If filtering fails
    fn apply(&self, rows: Vec<RowIndex>, dataset: &Dataset) -> Result<Vec<RowIndex>>;
}
