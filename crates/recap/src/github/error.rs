//! GitHub API error types.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error(transparent)]
    Transport(#[from] HttpError),

    #[error("authentication required")]
    AuthRequired,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),
}

impl GitHubError {
    /// Check if this error indicates a missing or rejected credential.
    #[inline]
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

/// Result type for GitHub API operations.
pub type Result<T> = std::result::Result<T, GitHubError>;
