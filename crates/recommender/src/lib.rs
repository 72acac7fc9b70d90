//! Recommender crate for the movie recommendation demo.
//!
//! This crate wires the data loader, classifier, pipeline and poster lookup
//! together behind a single orchestrator, and owns the application config.

pub mod config;
pub mod orchestrator;
pub mod types;

pub use config::{AppConfig, RecommendationSettings};
pub use orchestrator::RecommendationOrchestrator;
pub use types::{RecommendationItem, RecommendationPage};
