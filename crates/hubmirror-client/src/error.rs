//! Error types for the remote API clients.

use thiserror::Error;

/// Errors that can occur when calling a remote API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to build the underlying HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Transport failure (connect, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("call to {url} ended with status: {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body did not match the expected record.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ClientError {
    /// Returns true if the remote answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}
