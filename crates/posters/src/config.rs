//! Poster lookup settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    /// TMDB API key; lookups are disabled without one
    pub api_key: Option<String>,
    pub api_base_url: String,
    /// Prefix joined directly with the `poster_path` of a search hit
    pub image_base_url: String,
    /// Deadline for one title's lookup
    pub timeout_ms: u64,
    /// Lookups in flight at once
    pub max_concurrent: usize,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout_ms: 3_000,
            max_concurrent: 4,
        }
    }
}

impl PosterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Key with surrounding whitespace removed, `None` if blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
