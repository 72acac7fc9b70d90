//! Error types for the data-loader crate.
//!
//! Only whole-file problems surface here. A malformed `genres` or
//! `spoken_languages` cell is not an error: the row survives with an empty
//! list (see [`crate::parser::ParsedNames`]).

use thiserror::Error;

/// Errors that can occur while loading the movie dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open dataset file {path}: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer itself failed (bad quoting, invalid UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column the feature builder needs is absent from the header
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    /// Row couldn't be deserialized (e.g. a non-numeric vote_average)
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: u64, reason: String },

    /// Header present but no data rows
    #[error("Dataset contains no rows")]
    EmptyDataset,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
