//! Core domain types for the movie dataset.
//!
//! Everything here is computed once at load time and is read-only afterwards.
//! Rows are addressed by their position in the source file ([`RowIndex`]); the
//! record list, feature matrix and label vector all share that index.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of a movie in the loaded dataset (0-based, source order)
pub type RowIndex = usize;

/// Binary median-split label: 1 = rated at or above the dataset median
pub type Label = u8;

// =============================================================================
// Movie Records
// =============================================================================

/// One row of the movie dataset after list fields have been parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub overview: String,
    /// Kept verbatim, never validated as a calendar date
    pub release_date: String,
    /// May be empty
    pub homepage: String,
    /// `None` when the cell was empty
    pub vote_average: Option<f32>,
    /// `None` when the cell was empty
    pub popularity: Option<f32>,
    /// Genre names in source order. Empty if the cell failed to parse.
    pub genres: Vec<String>,
    /// Language names in source order. Empty if the cell failed to parse.
    pub spoken_languages: Vec<String>,
}

impl MovieRecord {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Genres joined for display ("Action, Adventure")
    pub fn genres_display(&self) -> String {
        self.genres.join(", ")
    }

    /// Spoken languages joined for display ("English, Français")
    pub fn languages_display(&self) -> String {
        self.spoken_languages.join(", ")
    }
}

// =============================================================================
// Genre Vocabulary
// =============================================================================

/// Sorted set of every genre name seen in the dataset.
///
/// Defines the one-hot column order of the feature matrix. A classifier
/// trained against one vocabulary is meaningless against another, so the
/// vocabulary is fitted once and then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreVocabulary {
    genres: Vec<String>,
}

impl GenreVocabulary {
    /// Collect and sort the distinct genre names across all records
    pub fn fit(records: &[MovieRecord]) -> Self {
        let genres: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.genres.iter().map(String::as_str))
            .collect();
        Self {
            genres: genres.into_iter().map(str::to_string).collect(),
        }
    }

    /// Column of `genre` in the one-hot block, if it is known
    pub fn index_of(&self, genre: &str) -> Option<usize> {
        self.genres
            .binary_search_by(|g| g.as_str().cmp(genre))
            .ok()
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.index_of(genre).is_some()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.genres
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }
}

// =============================================================================
// Scaling
// =============================================================================

/// Min-max scaler for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: f32,
    pub max: f32,
}

impl MinMaxScaler {
    /// Fit over a full column. An empty column fits to `[0, 0]`.
    pub fn fit(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self { min: 0.0, max: 0.0 };
        }
        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Self { min, max }
    }

    /// `(x - min) / (max - min)`, or 0 for a constant column.
    ///
    /// Values outside the fitted range are not clamped.
    pub fn transform(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            0.0
        } else {
            (value - self.min) / range
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// Scalers for the two numeric feature columns, fitted once over the whole
/// dataset and reused for every later transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleParams {
    pub vote_average: MinMaxScaler,
    pub popularity: MinMaxScaler,
}

// =============================================================================
// Load Report
// =============================================================================

/// Counts of rows that degraded during lenient parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows: usize,
    pub unparsed_genres: usize,
    pub unparsed_languages: usize,
}

// =============================================================================
// Dataset - records + derived features and labels
// =============================================================================

/// The loaded dataset and everything derived from it.
///
/// `records[i]`, `features.row(i)` and `labels[i]` always describe the same
/// movie. Any subset taken downstream must be taken by row index so the three
/// stay aligned.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub(crate) records: Vec<MovieRecord>,
    pub(crate) features: Array2<f32>,
    pub(crate) labels: Vec<Label>,
    pub(crate) vocabulary: GenreVocabulary,
    pub(crate) scale_params: ScaleParams,
    pub(crate) median_vote_average: Option<f32>,
    pub(crate) report: LoadReport,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every row index, in load order
    pub fn all_rows(&self) -> Vec<RowIndex> {
        (0..self.records.len()).collect()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn get_record(&self, row: RowIndex) -> Option<&MovieRecord> {
        self.records.get(row)
    }

    /// Full feature matrix, one row per record
    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    pub fn feature_row(&self, row: RowIndex) -> Option<ArrayView1<'_, f32>> {
        (row < self.features.nrows()).then(|| self.features.row(row))
    }

    /// `|vocabulary| + 2`
    pub fn feature_width(&self) -> usize {
        self.features.ncols()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    pub fn scale_params(&self) -> &ScaleParams {
        &self.scale_params
    }

    /// Median vote_average over rows that have one
    pub fn median_vote_average(&self) -> Option<f32> {
        self.median_vote_average
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}
