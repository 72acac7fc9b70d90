//! TMDB movie search client
//!
//! API Flow:
//! 1. `GET {api_base}/search/movie?api_key=..&query={title}`
//! 2. Take the first result's `poster_path`
//! 3. Poster URL is `{image_base}{poster_path}`

use crate::config::PosterConfig;
use crate::error::{PosterError, Result};
use crate::lookup::PosterLookup;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    poster_path: Option<String>,
}

#[derive(Clone)]
pub struct TmdbPosterClient {
    http_client: HttpClient,
    api_key: String,
    api_base_url: String,
    image_base_url: String,
}

impl TmdbPosterClient {
    /// Returns `Ok(None)` when the config has no API key
    pub fn from_config(config: &PosterConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };
        let http_client = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Some(Self {
            http_client,
            api_key: api_key.to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
        }))
    }

    /// Search TMDB for `title` and build the poster URL of the first hit
    pub async fn search_poster(&self, title: &str) -> Result<Option<String>> {
        let url = format!("{}/search/movie", self.api_base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await
            .map_err(without_url)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PosterError::Status { status, body });
        }

        let search: SearchResponse = response.json().await.map_err(without_url)?;
        Ok(self.poster_url(search))
    }

    fn poster_url(&self, search: SearchResponse) -> Option<String> {
        let path = search.results.into_iter().next()?.poster_path?;
        if path.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.image_base_url, path))
    }
}

/// Request URLs carry the API key, so they never reach an error message
fn without_url(e: reqwest::Error) -> PosterError {
    PosterError::Http(e.without_url())
}

#[async_trait]
impl PosterLookup for TmdbPosterClient {
    async fn poster_for(&self, title: &str) -> Option<String> {
        match self.search_poster(title).await {
            Ok(poster) => {
                debug!(title, found = poster.is_some(), "Poster lookup finished");
                poster
            }
            Err(e) => {
                warn!(title, error = %e, "Poster lookup failed");
                None
            }
        }
    }
}
