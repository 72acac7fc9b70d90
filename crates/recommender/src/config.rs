//! Application configuration.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. `MOVIE_RECS__*` environment variables (`__` separates nesting levels,
//!    e.g. `MOVIE_RECS__POSTERS__API_KEY`)
//!
//! A `.env` file in the working directory is read into the environment first.
//! `TMDB_API_KEY` is accepted as a fallback for the poster API key.

use anyhow::{Context, Result};
use classifier::ClassifierConfig;
use config::{Environment, File, FileFormat};
use pipeline::{DEFAULT_PAGE_SIZE, EvaluationMode};
use posters::PosterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "MOVIE_RECS";
pub const DEFAULT_DATASET_PATH: &str = "data/tmdb_5000_movies.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub classifier: ClassifierConfig,
    pub posters: PosterConfig,
    pub recommendations: RecommendationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    pub page_size: usize,
    pub evaluation: EvaluationMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            classifier: ClassifierConfig::default(),
            posters: PosterConfig::default(),
            recommendations: RecommendationSettings::default(),
        }
    }
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            evaluation: EvaluationMode::default(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then `file` (if given), then the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default()).context("Serializing default config")?);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Reading configuration")?;

        let mut config: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        if config.posters.api_key().is_none() {
            config.posters.api_key = std::env::var("TMDB_API_KEY").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier
            .validate()
            .context("Invalid classifier configuration")?;
        anyhow::ensure!(
            self.recommendations.page_size > 0,
            "recommendations.page_size must be at least 1"
        );
        anyhow::ensure!(
            self.posters.max_concurrent > 0,
            "posters.max_concurrent must be at least 1"
        );
        Ok(())
    }
}
