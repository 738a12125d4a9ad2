//! Error types for cf-source

use thiserror::Error;

/// Source API errors. None of them are retried.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport failure: connection, TLS, timeout (S001)
    #[error("[S001] HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Non-success response: auth, quota, bad request (S002)
    #[error("[S002] {resource} request returned HTTP {status} ({reason}): {message}")]
    Api {
        resource: String,
        status: u16,
        reason: String,
        message: String,
    },

    /// Response body was not the expected JSON (S003)
    #[error("[S003] Failed to decode {resource} response")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required lookup returned no items (S004)
    #[error("[S004] {resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
}

impl SourceError {
    /// Whether the daily quota has been exhausted
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, SourceError::Api { reason, .. } if reason == "quotaExceeded" || reason == "dailyLimitExceeded")
    }
}

/// Result type alias for SourceError
pub type SourceResult<T> = Result<T, SourceError>;
