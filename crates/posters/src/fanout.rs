//! Bounded concurrent poster fetching with a per-title deadline.

use crate::error::PosterError;
use crate::lookup::PosterLookup;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::warn;

/// Look up posters for `titles`, at most `max_concurrent` at a time.
///
/// The result is index-aligned with `titles`. A lookup that misses the
/// `timeout` deadline yields `None` like any other failure.
pub async fn fetch_posters<L>(
    lookup: &L,
    titles: &[String],
    max_concurrent: usize,
    timeout: Duration,
) -> Vec<Option<String>>
where
    L: PosterLookup + ?Sized,
{
    stream::iter(titles)
        .map(|title| async move {
            match tokio::time::timeout(timeout, lookup.poster_for(title)).await {
                Ok(poster) => poster,
                Err(_) => {
                    let error = PosterError::Timeout(timeout.as_millis() as u64);
                    warn!(title = title.as_str(), error = %error, "Poster lookup abandoned");
                    None
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await
}
