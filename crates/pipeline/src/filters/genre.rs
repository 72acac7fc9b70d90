//! Filter to keep only movies tagged with one selected genre.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Dataset, RowIndex};
use rayon::prelude::*;

/// Keeps only rows whose genre list contains the selected genre.
///
/// ## Algorithm
/// 1. If the genre is not in the dataset vocabulary, nothing can match
/// 2. Otherwise keep each row whose record lists the genre (exact match)
/// 3. Preserve input order
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    /// Create a new GenreFilter.
    ///
    /// # Arguments
    /// * `genre` - Genre name, matched case-sensitively
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
        }
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, rows: Vec<RowIndex>, dataset: &Dataset) -> Result<Vec<RowIndex>> {
        if !dataset.vocabulary().contains(&self.genre) {
            return Ok(Vec::new());
        }

        // Indexed parallel collect keeps input order
        let filtered = rows
            .into_par_iter()
            .filter(|&row| {
                dataset
                    .get_record(row)
                    .is_some_and(|record| record.has_genre(&self.genre))
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dataset_with_genres;

    #[test]
    fn test_keeps_matching_rows_in_order() {
        let dataset = dataset_with_genres(&[
            &["Action", "Adventure"],
            &["Drama"],
            &["Science Fiction", "Action"],
            &["Action"],
        ]);

        let filtered = GenreFilter::new("Action")
            .apply(dataset.all_rows(), &dataset)
            .unwrap();
        assert_eq!(filtered, vec![0, 2, 3]);
    }

    #[test]
    fn test_unknown_genre_is_empty() {
        let dataset = dataset_with_genres(&[&["Action"], &["Drama"]]);

        let filtered = GenreFilter::new("Western")
            .apply(dataset.all_rows(), &dataset)
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_match_is_exact() {
        let dataset = dataset_with_genres(&[&["Action"], &["Drama"]]);

        let filtered = GenreFilter::new("action")
            .apply(dataset.all_rows(), &dataset)
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_ignores_out_of_range_rows() {
        let dataset = dataset_with_genres(&[&["Action"]]);

        let filtered = GenreFilter::new("Action")
            .apply(vec![0, 7], &dataset)
            .unwrap();
        assert_eq!(filtered, vec![0]);
    }
}
