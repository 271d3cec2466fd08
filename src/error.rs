//! Error types for microgpt-viz.

use thiserror::Error;

/// Result type alias for microgpt-viz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for microgpt-viz.
///
/// Errors here describe transport and decoding failures. None of them are
/// fatal to a visualization run: the pipeline controller absorbs them and
/// falls back to the best partial result.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error (connect, read, or TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {0}")]
    BackendStatus(u16),

    /// Vocabulary payload was missing or malformed.
    #[error("vocabulary load failed: {0}")]
    VocabLoad(String),
}
