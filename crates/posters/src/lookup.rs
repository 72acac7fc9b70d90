//! The poster lookup seam.

use async_trait::async_trait;

/// Resolves a movie title to a poster image URL.
///
/// Implementations never fail: a network error, an API error or a search
/// with no usable hit all come back as `None`.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    async fn poster_for(&self, title: &str) -> Option<String>;
}

/// Lookup used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPosterLookup;

#[async_trait]
impl PosterLookup for DisabledPosterLookup {
    async fn poster_for(&self, _title: &str) -> Option<String> {
        None
    }
}
