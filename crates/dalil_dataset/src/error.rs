//! Error types for dataset fetching operations.

use reqwest::StatusCode;
use thiserror::Error;

use crate::security::SecurityError;

/// Error type for dataset fetch operations.
///
/// Cloneable so that every caller joined onto one in-flight fetch
/// receives the same failure.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The data source answered with a non-2xx status.
    #[error("Failed to load dataset from {url}: HTTP {status}")]
    Status { status: StatusCode, url: String },

    /// Network request failed before a response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not a JSON array of records.
    #[error("Invalid dataset body: {0}")]
    InvalidBody(String),

    /// Base URL or dataset name could not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL rejected by the address policy.
    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    /// The background fetch task panicked or was cancelled.
    #[error("Dataset fetch interrupted: {0}")]
    Interrupted(String),

    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// Returns the HTTP status when the failure came from the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status,
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        Self::Network(err.to_string())
    }
}
