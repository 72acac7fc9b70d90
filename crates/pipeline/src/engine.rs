//! Genre-filtered, score-ranked, paginated recommendations.
//!
//! ## Per-request flow
//! 1. Filter all rows down to the selected genre
//! 2. Score the matching feature rows with the classifier
//! 3. Rank by descending score (ties by row index)
//! 4. Cut the page the cursor points at
//! 5. Score the page against its true labels

use crate::error::{PipelineError, Result};
use crate::evaluation::{EvaluationMode, Metrics};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::GenreFilter;
use crate::pagination::PageCursor;
use crate::ranking::{RankedRow, rank_by_score};
use classifier::Scorer;
use data_loader::{Dataset, Label};
use ndarray::Axis;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One page of ranked rows for a genre
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationWindow {
    pub genre: String,
    pub offset: usize,
    /// Rows in the whole ranked list, not just this page
    pub total_matches: usize,
    pub rows: Vec<RankedRow>,
    pub metrics: Metrics,
}

impl RecommendationWindow {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.offset + self.rows.len() < self.total_matches
    }
}

/// Read-only recommendation core over a loaded dataset and trained scorer.
///
/// Holds no per-session state; pagination lives in the caller's
/// [`PageCursor`].
#[derive(Clone)]
pub struct RecommendationEngine {
    dataset: Arc<Dataset>,
    scorer: Arc<dyn Scorer>,
    evaluation: EvaluationMode,
}

impl RecommendationEngine {
    /// Fails if the scorer was built for a different feature width
    pub fn new(dataset: Arc<Dataset>, scorer: Arc<dyn Scorer>) -> Result<Self> {
        if scorer.input_width() != dataset.feature_width() {
            return Err(PipelineError::WidthMismatch {
                scorer: scorer.input_width(),
                dataset: dataset.feature_width(),
            });
        }
        Ok(Self {
            dataset,
            scorer,
            evaluation: EvaluationMode::default(),
        })
    }

    /// Builder-style override of how window metrics are computed
    pub fn with_evaluation(mut self, mode: EvaluationMode) -> Self {
        self.evaluation = mode;
        self
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn evaluation(&self) -> EvaluationMode {
        self.evaluation
    }

    /// All rows of `genre`, best first. Empty if the genre is unknown.
    #[instrument(skip(self))]
    pub fn rank(&self, genre: &str) -> Result<Vec<RankedRow>> {
        let rows = FilterPipeline::new()
            .add_filter(GenreFilter::new(genre))
            .apply(self.dataset.all_rows(), &self.dataset)?;

        if rows.is_empty() {
            debug!("No rows match genre");
            return Ok(Vec::new());
        }

        let subset = self.dataset.features().select(Axis(0), &rows);
        let scores = self.scorer.score(subset.view())?;
        if scores.len() != rows.len() {
            return Err(PipelineError::ScoreCountMismatch {
                expected: rows.len(),
                found: scores.len(),
            });
        }

        let ranked = rank_by_score(&rows, &scores);
        debug!(matches = ranked.len(), "Ranked genre rows");
        Ok(ranked)
    }

    /// The page of `genre` at `cursor`, with metrics for that page
    #[instrument(skip(self, cursor), fields(offset = cursor.offset(), page_size = cursor.page_size()))]
    pub fn window(&self, genre: &str, cursor: &PageCursor) -> Result<RecommendationWindow> {
        let ranked = self.rank(genre)?;
        let rows = cursor.window(&ranked).to_vec();

        let true_labels: Vec<Label> = rows
            .iter()
            .map(|r| self.dataset.labels()[r.row])
            .collect();
        let scores: Vec<f32> = rows.iter().map(|r| r.score).collect();
        let metrics = Metrics::for_window(&true_labels, &scores, self.evaluation);

        Ok(RecommendationWindow {
            genre: genre.to_string(),
            offset: cursor.offset(),
            total_matches: ranked.len(),
            rows,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PopularityScorer, dataset_from};

    fn engine() -> RecommendationEngine {
        // (genres, vote, popularity); score is the scaled popularity
        let dataset = dataset_from(&[
            (&["Action"], 8.0, 10.0),
            (&["Drama"], 6.0, 90.0),
            (&["Action", "Drama"], 5.0, 50.0),
            (&["Action"], 7.5, 50.0),
            (&["Action"], 3.0, 100.0),
            (&["Comedy"], 9.0, 0.0),
            (&["Action"], 6.5, 0.0),
        ]);
        let width = dataset.feature_width();
        RecommendationEngine::new(Arc::new(dataset), Arc::new(PopularityScorer::new(width))).unwrap()
    }

    fn rows_of(ranked: &[RankedRow]) -> Vec<usize> {
        ranked.iter().map(|r| r.row).collect()
    }

    #[test]
    fn test_rank_orders_by_score_then_row() {
        let ranked = engine().rank("Action").unwrap();
        // popularity 100, 50 (row 2), 50 (row 3), 10, 0
        assert_eq!(rows_of(&ranked), vec![4, 2, 3, 0, 6]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_unknown_genre_is_empty() {
        let engine = engine();
        assert!(engine.rank("Western").unwrap().is_empty());

        let window = engine.window("Western", &PageCursor::new(5)).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.total_matches, 0);
        assert_eq!(window.metrics, Metrics::default());
    }

    #[test]
    fn test_pages_are_disjoint_and_contiguous() {
        let engine = engine();
        let full = rows_of(&engine.rank("Action").unwrap());

        let mut cursor = PageCursor::new(2);
        let mut seen = Vec::new();
        loop {
            let window = engine.window("Action", &cursor).unwrap();
            if window.is_empty() {
                break;
            }
            assert_eq!(window.offset, seen.len());
            seen.extend(rows_of(&window.rows));
            cursor.advance();
        }
        assert_eq!(seen, full);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let window = engine().window("Action", &PageCursor::at(50, 5)).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.total_matches, 5);
        assert!(!window.has_more());
    }

    #[test]
    fn test_window_metrics_use_window_labels() {
        let engine = engine().with_evaluation(EvaluationMode::SanityCheck);
        let window = engine.window("Action", &PageCursor::new(5)).unwrap();

        // Median vote is 6.5, so rows 0, 3 and 6 are positive
        let labels: Vec<u8> = window
            .rows
            .iter()
            .map(|r| engine.dataset().labels()[r.row])
            .collect();
        assert_eq!(labels, vec![0, 0, 1, 1, 1]);
        assert_eq!(window.metrics.accuracy, 1.0);
        assert_eq!(window.metrics.recall, 1.0);
    }

    #[test]
    fn test_model_prediction_metrics() {
        let engine = engine().with_evaluation(EvaluationMode::ModelPredictions);
        let window = engine.window("Action", &PageCursor::new(5)).unwrap();

        // Scores 1.0, 0.5, 0.5, 0.1, 0.0 predict 1, 1, 1, 0, 0
        // against truth 0, 0, 1, 1, 1
        assert!((window.metrics.accuracy - 0.2).abs() < 1e-6);
        assert!((window.metrics.recall - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let dataset = dataset_from(&[(&["Action"], 5.0, 1.0)]);
        let result = RecommendationEngine::new(Arc::new(dataset), Arc::new(PopularityScorer::new(99)));
        assert!(matches!(result, Err(PipelineError::WidthMismatch { scorer: 99, .. })));
    }
}
