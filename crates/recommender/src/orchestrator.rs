//! # Recommendation Orchestrator
//!
//! This module coordinates the whole recommendation flow.
//!
//! Initialization (once, blocking work off the async runtime):
//! 1. Load the dataset and build features and labels
//! 2. Train the classifier
//! 3. Build the poster lookup
//!
//! Per request:
//! 1. Rank the selected genre and cut the cursor's page (spawn_blocking)
//! 2. Fetch posters for the page concurrently, each with a deadline
//! 3. Enrich rows into display items
//!
//! After initialization everything is shared read-only state; the
//! orchestrator is cheap to clone and holds no session state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use classifier::{Classifier, Scorer, TrainingReport};
use data_loader::Dataset;
use pipeline::{PageCursor, RecommendationEngine};
use posters::{PosterLookup, fetch_posters};

use crate::config::AppConfig;
use crate::types::{RecommendationItem, RecommendationPage};

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    engine: RecommendationEngine,
    posters: Arc<dyn PosterLookup>,
    poster_timeout: Duration,
    max_concurrent_posters: usize,
    page_size: usize,
    training_report: Option<TrainingReport>,
}

impl RecommendationOrchestrator {
    /// Load, train and wire everything from `config`.
    ///
    /// Loading and training run on the blocking pool; a failure in either is
    /// fatal and no orchestrator is returned.
    pub async fn initialize(config: &AppConfig) -> Result<Self> {
        let start_time = Instant::now();
        let dataset_path = config.dataset_path.clone();
        let classifier_config = config.classifier.clone();

        let (dataset, model, report) = tokio::task::spawn_blocking(move || -> Result<_> {
            let dataset = Dataset::load(&dataset_path)
                .with_context(|| format!("Failed to load dataset from {}", dataset_path.display()))?;
            let (model, report) =
                Classifier::train(dataset.features().view(), dataset.labels(), &classifier_config)
                    .context("Failed to train classifier")?;
            Ok((dataset, model, report))
        })
        .await
        .context("Initialization task panicked")??;

        let posters =
            posters::lookup_from_config(&config.posters).context("Failed to build poster lookup")?;

        let orchestrator = Self::from_parts(Arc::new(dataset), Arc::new(model), posters, config)?
            .with_training_report(report);

        info!(
            "Initialization finished in {:.2?} ({} movies, {} genres)",
            start_time.elapsed(),
            orchestrator.dataset().len(),
            orchestrator.genres().len()
        );
        Ok(orchestrator)
    }

    /// Wire an orchestrator from already-built parts
    pub fn from_parts(
        dataset: Arc<Dataset>,
        scorer: Arc<dyn Scorer>,
        posters: Arc<dyn PosterLookup>,
        config: &AppConfig,
    ) -> Result<Self> {
        let engine = RecommendationEngine::new(dataset, scorer)
            .context("Scorer does not match the dataset")?
            .with_evaluation(config.recommendations.evaluation);

        Ok(Self {
            engine,
            posters,
            poster_timeout: config.posters.timeout(),
            max_concurrent_posters: config.posters.max_concurrent,
            page_size: config.recommendations.page_size,
            training_report: None,
        })
    }

    pub fn with_training_report(mut self, report: TrainingReport) -> Self {
        self.training_report = Some(report);
        self
    }

    pub fn dataset(&self) -> &Dataset {
        self.engine.dataset()
    }

    /// Selectable genres, sorted
    pub fn genres(&self) -> &[String] {
        self.dataset().vocabulary().as_slice()
    }

    pub fn training_report(&self) -> Option<&TrainingReport> {
        self.training_report.as_ref()
    }

    /// A fresh cursor at the configured page size
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.page_size)
    }

    /// Main entry point: one page of recommendations for `genre`.
    ///
    /// An unknown genre or an offset past the end gives an empty page, not an
    /// error. Poster failures leave `poster_url` empty.
    #[instrument(skip(self, cursor), fields(offset = cursor.offset()))]
    pub async fn recommend(&self, genre: &str, cursor: &PageCursor) -> Result<RecommendationPage> {
        let start_time = Instant::now();

        let window = tokio::task::spawn_blocking({
            let engine = self.engine.clone();
            let genre = genre.to_string();
            let cursor = *cursor;
            move || engine.window(&genre, &cursor)
        })
        .await
        .context("Ranking task panicked")?
        .context("Failed to rank genre")?;

        let dataset = self.dataset();
        let titles: Vec<String> = window
            .rows
            .iter()
            .filter_map(|r| dataset.get_record(r.row))
            .map(|record| record.title.clone())
            .collect();

        let posters = fetch_posters(
            self.posters.as_ref(),
            &titles,
            self.max_concurrent_posters,
            self.poster_timeout,
        )
        .await;

        let items: Vec<RecommendationItem> = window
            .rows
            .iter()
            .filter_map(|r| dataset.get_record(r.row).map(|record| (r, record)))
            .zip(posters)
            .map(|((r, record), poster)| RecommendationItem::from_record(r.row, record, r.score, poster))
            .collect();

        info!(
            "Built {} of {} recommendations in {:.2?}",
            items.len(),
            window.total_matches,
            start_time.elapsed()
        );

        Ok(RecommendationPage {
            genre: window.genre,
            items,
            metrics: window.metrics,
            offset: window.offset,
            total_matches: window.total_matches,
        })
    }
}
