//! Feature and label construction.
//!
//! Builds the [`Dataset`] from parsed records:
//! - Fit the genre vocabulary and the two min-max scalers over every row
//! - Assemble `[one-hot genres] ++ [scaled vote_average] ++ [scaled popularity]`
//! - Derive median-split labels from the full vote_average column
//!
//! The fitted [`FeatureBuilder`] is kept on the dataset so later transforms
//! reuse the same vocabulary and scale parameters instead of refitting.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use ndarray::Array2;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Number of scaled numeric columns appended after the one-hot block
pub const NUMERIC_FEATURES: usize = 2;

/// Fitted vocabulary + scalers: turns a [`MovieRecord`] into a feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBuilder {
    vocabulary: GenreVocabulary,
    scale_params: ScaleParams,
}

impl FeatureBuilder {
    /// Fit vocabulary and scalers over the complete record set.
    ///
    /// Missing numeric values count as 0 for the purpose of scaling.
    pub fn fit(records: &[MovieRecord]) -> Self {
        let votes: Vec<f32> = records.iter().map(|r| r.vote_average.unwrap_or(0.0)).collect();
        let popularity: Vec<f32> = records.iter().map(|r| r.popularity.unwrap_or(0.0)).collect();

        Self {
            vocabulary: GenreVocabulary::fit(records),
            scale_params: ScaleParams {
                vote_average: MinMaxScaler::fit(&votes),
                popularity: MinMaxScaler::fit(&popularity),
            },
        }
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    pub fn scale_params(&self) -> &ScaleParams {
        &self.scale_params
    }

    /// `|vocabulary| + 2`
    pub fn width(&self) -> usize {
        self.vocabulary.len() + NUMERIC_FEATURES
    }

    /// Feature vector for one record.
    ///
    /// Genres outside the fitted vocabulary contribute nothing.
    pub fn row(&self, record: &MovieRecord) -> Vec<f32> {
        let mut row = vec![0.0; self.width()];
        for genre in &record.genres {
            if let Some(col) = self.vocabulary.index_of(genre) {
                row[col] = 1.0;
            }
        }

        let n = self.vocabulary.len();
        row[n] = self
            .scale_params
            .vote_average
            .transform(record.vote_average.unwrap_or(0.0));
        row[n + 1] = self
            .scale_params
            .popularity
            .transform(record.popularity.unwrap_or(0.0));
        row
    }

    /// Feature matrix for `records`, row-aligned with the input
    pub fn transform(&self, records: &[MovieRecord]) -> Array2<f32> {
        let width = self.width();
        let rows: Vec<Vec<f32>> = records.par_iter().map(|r| self.row(r)).collect();

        let mut matrix = Array2::zeros((records.len(), width));
        for (mut dst, src) in matrix.rows_mut().into_iter().zip(rows) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s;
            }
        }
        matrix
    }
}

/// Median of the present vote_average values, `None` if there are none.
///
/// Even counts average the two middle values.
pub fn median_vote_average(records: &[MovieRecord]) -> Option<f32> {
    let mut votes: Vec<f32> = records
        .iter()
        .filter_map(|r| r.vote_average)
        .filter(|v| !v.is_nan())
        .collect();
    if votes.is_empty() {
        return None;
    }

    votes.sort_by(f32::total_cmp);
    let mid = votes.len() / 2;
    if votes.len() % 2 == 0 {
        Some((votes[mid - 1] + votes[mid]) / 2.0)
    } else {
        Some(votes[mid])
    }
}

/// Label each record 1 if its vote_average is at or above `median`, else 0.
///
/// Records with no vote_average (or no median at all) are labelled 0.
/// `median` must come from the full dataset, never from a subset.
pub fn median_split_labels(records: &[MovieRecord], median: Option<f32>) -> Vec<Label> {
    records
        .iter()
        .map(|r| match (r.vote_average, median) {
            (Some(vote), Some(median)) if vote >= median => 1,
            _ => 0,
        })
        .collect()
}

impl Dataset {
    /// Load the movie CSV and derive features and labels.
    ///
    /// Steps:
    /// 1. Parse rows (list cells degrade leniently)
    /// 2. Fit vocabulary and scalers over all rows
    /// 3. Build the feature matrix
    /// 4. Compute median-split labels
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading movie dataset from {}", path.display());

        let (records, report) = parser::parse_movies(path)?;
        let mut dataset = Self::from_records(records)?;
        dataset.report = report;

        info!(
            "Loaded {} movies ({} genres, {} unparsed genre cells, {} unparsed language cells)",
            dataset.len(),
            dataset.vocabulary.len(),
            report.unparsed_genres,
            report.unparsed_languages
        );
        Ok(dataset)
    }

    /// Build a dataset from already-parsed records
    pub fn from_records(records: Vec<MovieRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(DataLoadError::EmptyDataset);
        }

        let builder = FeatureBuilder::fit(&records);
        let features = builder.transform(&records);
        let median = median_vote_average(&records);
        let labels = median_split_labels(&records, median);

        debug!(
            rows = records.len(),
            width = builder.width(),
            median = ?median,
            positives = labels.iter().filter(|&&l| l == 1).count(),
            "Built feature matrix"
        );

        let FeatureBuilder {
            vocabulary,
            scale_params,
        } = builder;

        Ok(Self {
            report: LoadReport {
                rows: records.len(),
                ..LoadReport::default()
            },
            records,
            features,
            labels,
            vocabulary,
            scale_params,
            median_vote_average: median,
        })
    }

    /// The fitted builder, for transforming records with the same vocabulary
    /// and scale parameters the classifier was trained on
    pub fn feature_builder(&self) -> FeatureBuilder {
        FeatureBuilder {
            vocabulary: self.vocabulary.clone(),
            scale_params: self.scale_params,
        }
    }

    /// Rows whose genres contain `genre`, in dataset order
    pub fn rows_with_genre(&self, genre: &str) -> Vec<RowIndex> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_genre(genre))
            .map(|(i, _)| i)
            .collect()
    }
}
