//! error handling stuff
use thiserror::Error;

/// errors produced by the dataset pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// bad run parameters, reported before any network activity
    #[error("configuration error: {0}")]
    Config(String),

    /// an http failure at the metadata or image stage
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// malformed image bytes
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// no posts survived fetching and filtering
    #[error("no posts left to download ({fetched} fetched, {survived} after filtering)")]
    EmptyResult {
        /// records fetched from the api
        fetched: usize,
        /// records remaining after the include/exclude filters
        survived: usize,
    },

    /// an i/o error
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// a json error at the metadata stage
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A result using [`Error`] as the `Err` variant
pub type Result<T, E = Error> = std::result::Result<T, E>;
