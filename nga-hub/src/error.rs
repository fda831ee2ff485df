//! Error types for the NGA Hub library.

use thiserror::Error;

/// Errors that can occur when fetching and summarizing the dataset catalog.
#[derive(Error, Debug)]
pub enum HubError {
    /// The upstream request failed before a complete response was received
    /// (DNS, refused connection, timeout, interrupted body).
    #[error("Upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with a non-success HTTP status.
    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    /// The upstream body is not JSON or does not have the expected shape.
    #[error("Invalid catalog payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A field that must be a value when present is `null`.
    #[error("Field '{field}' is null")]
    NullField { field: &'static str },

    /// A `created` value cannot be represented as a calendar date.
    #[error("Created timestamp out of range: {millis} ms")]
    TimestampOutOfRange { millis: f64 },

    /// The configured base URL cannot be parsed.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be initialized.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl HubError {
    /// Whether this error was caused by the upstream service being unreachable
    /// or answering with an error status.
    ///
    /// Everything else (bad payloads, conversion failures, configuration
    /// problems) is an internal error.
    pub fn is_upstream(&self) -> bool {
        matches!(self, HubError::Transport(_) | HubError::Status { .. })
    }
}

/// Result type alias using [`HubError`].
pub type Result<T> = std::result::Result<T, HubError>;
