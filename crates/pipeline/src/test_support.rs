//! Small datasets and a deterministic scorer for unit tests.

use classifier::{ClassifierError, Scorer};
use data_loader::{Dataset, MovieRecord};
use ndarray::ArrayView2;

/// One record per entry, titled `Movie {row}`, votes 5.0, popularity 1.0
pub(crate) fn dataset_with_genres(genres: &[&[&str]]) -> Dataset {
    let rows: Vec<(&[&str], f32, f32)> = genres.iter().map(|&g| (g, 5.0, 1.0)).collect();
    dataset_from(&rows)
}

/// One record per `(genres, vote_average, popularity)` entry
pub(crate) fn dataset_from(rows: &[(&[&str], f32, f32)]) -> Dataset {
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, (genres, vote, popularity))| MovieRecord {
            title: format!("Movie {i}"),
            vote_average: Some(*vote),
            popularity: Some(*popularity),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            spoken_languages: vec!["English".to_string()],
            ..MovieRecord::default()
        })
        .collect();
    Dataset::from_records(records).unwrap()
}

/// Scores each row with its scaled popularity (the last feature column)
pub(crate) struct PopularityScorer {
    width: usize,
}

impl PopularityScorer {
    pub(crate) fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Scorer for PopularityScorer {
    fn score(&self, features: ArrayView2<'_, f32>) -> classifier::Result<Vec<f32>> {
        if features.ncols() != self.width {
            return Err(ClassifierError::WidthMismatch {
                expected: self.width,
                found: features.ncols(),
            });
        }
        Ok(features.column(self.width - 1).to_vec())
    }

    fn input_width(&self) -> usize {
        self.width
    }
}
