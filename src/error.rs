// Error taxonomy for the scrape → corpus → model pipeline.
//
// Every variant is fatal: nothing in the pipeline retries or recovers. The
// binary wraps these in anyhow and exits non-zero with the message.

use thiserror::Error;

/// Top-level error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The page fetch failed or returned a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// The HTML body or the configured selector could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Every extracted document yielded zero usable tokens.
    #[error("validation error: {0}")]
    Validation(String),

    /// The topic model rejected its input.
    #[error("modeling error: {0}")]
    Modeling(String),

    /// Writing the visualization (or any other file) failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Network(err.to_string())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
