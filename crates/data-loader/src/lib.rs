//! # Data Loader Crate
//!
//! Loads the movie CSV and turns it into model-ready data.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, GenreVocabulary, ScaleParams, Dataset)
//! - **parser**: Parse the CSV, with lenient per-cell parsing of list fields
//! - **features**: Vocabulary/scaler fitting, feature matrix, median-split labels
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load(Path::new("tmdb_5000_movies.csv"))?;
//!
//! println!("{} movies, {} genres", dataset.len(), dataset.vocabulary().len());
//! let first = dataset.feature_row(0).unwrap();
//! assert_eq!(first.len(), dataset.feature_width());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod features;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use features::{FeatureBuilder, NUMERIC_FEATURES, median_split_labels, median_vote_average};
pub use parser::{ParsedNames, parse_name_list};
pub use types::{
    // Type aliases
    RowIndex,
    Label,
    // Core types
    MovieRecord,
    GenreVocabulary,
    MinMaxScaler,
    ScaleParams,
    LoadReport,
    Dataset,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display_strings() {
        let record = MovieRecord {
            title: "Avatar".to_string(),
            genres: vec!["Action".to_string(), "Adventure".to_string()],
            spoken_languages: vec!["English".to_string(), "Español".to_string()],
            ..MovieRecord::default()
        };

        assert_eq!(record.genres_display(), "Action, Adventure");
        assert_eq!(record.languages_display(), "English, Español");
        assert!(record.has_genre("Action"));
        assert!(!record.has_genre("action"));
    }

    #[test]
    fn test_empty_display_strings() {
        let record = MovieRecord::default();
        assert_eq!(record.genres_display(), "");
        assert_eq!(record.languages_display(), "");
    }

    #[test]
    fn test_scaler_degenerate_and_empty() {
        let scaler = MinMaxScaler::fit(&[3.0, 3.0, 3.0]);
        assert!(scaler.is_degenerate());
        assert_eq!(scaler.transform(3.0), 0.0);

        let empty = MinMaxScaler::fit(&[]);
        assert_eq!(empty.transform(10.0), 0.0);
    }

    #[test]
    fn test_scaler_range() {
        let scaler = MinMaxScaler::fit(&[2.0, 4.0, 10.0]);
        assert_eq!(scaler.transform(2.0), 0.0);
        assert_eq!(scaler.transform(10.0), 1.0);
        assert!((scaler.transform(4.0) - 0.25).abs() < 1e-6);
    }
}
