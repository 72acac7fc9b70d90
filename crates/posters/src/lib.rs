//! Posters Crate
//!
//! Resolves movie titles to poster image URLs for display.
//!
//! ## Components
//! - [`PosterLookup`]: the lookup seam; implementations never fail
//! - [`TmdbPosterClient`]: TMDB movie search over HTTP
//! - [`DisabledPosterLookup`]: used when no API key is configured
//! - [`fetch_posters`]: bounded concurrent fan-out with a per-title timeout

pub mod config;
pub mod error;
pub mod fanout;
pub mod lookup;
pub mod tmdb;

use std::sync::Arc;

pub use config::PosterConfig;
pub use error::{PosterError, Result};
pub use fanout::fetch_posters;
pub use lookup::{DisabledPosterLookup, PosterLookup};
pub use tmdb::TmdbPosterClient;

/// TMDB lookup when the config carries an API key, otherwise the disabled one
pub fn lookup_from_config(config: &PosterConfig) -> Result<Arc<dyn PosterLookup>> {
    match TmdbPosterClient::from_config(config)? {
        Some(client) => Ok(Arc::new(client)),
        None => {
            tracing::info!("No poster API key configured, posters disabled");
            Ok(Arc::new(DisabledPosterLookup))
        }
    }
}
