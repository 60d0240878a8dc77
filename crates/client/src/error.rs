//! Client-side API error type.

use thiserror::Error;

/// Failure while talking to the ordering backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        /// First part of the response body, for diagnostics.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("decoding response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    /// Whether the failure indicates the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}
