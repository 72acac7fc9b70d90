//! Display-ready recommendation types.

use data_loader::{MovieRecord, RowIndex};
use pipeline::Metrics;
use serde::Serialize;

/// One recommendation card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    pub row: RowIndex,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: String,
    /// Genres joined with ", "
    pub genres: String,
    pub homepage: String,
    /// Spoken languages joined with ", "
    pub spoken_languages: String,
    pub overview: String,
    pub score: f32,
}

impl RecommendationItem {
    pub fn from_record(row: RowIndex, record: &MovieRecord, score: f32, poster_url: Option<String>) -> Self {
        Self {
            row,
            title: record.title.clone(),
            poster_url,
            release_date: record.release_date.clone(),
            genres: record.genres_display(),
            homepage: record.homepage.clone(),
            spoken_languages: record.languages_display(),
            overview: record.overview.clone(),
            score,
        }
    }
}

/// One page of recommendations for a genre plus its window metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPage {
    pub genre: String,
    pub items: Vec<RecommendationItem>,
    pub metrics: Metrics,
    pub offset: usize,
    pub total_matches: usize,
}

impl RecommendationPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total_matches
    }
}
