//! Errors inside poster lookup. These never cross the
//! [`PosterLookup`](crate::PosterLookup) boundary; they are logged and turned
//! into a missing poster.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Poster API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Poster lookup timed out after {0} ms")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, PosterError>;
