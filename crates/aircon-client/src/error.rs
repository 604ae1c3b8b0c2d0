//! Client error types

use thiserror::Error;

use crate::dispatcher::GENERIC_FAILURE;

/// Snapshot fetch errors. Never shown to the user.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A command the backend did not apply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct CommandFailure {
    /// Human-readable reason, shown verbatim
    pub detail: String,
}

impl CommandFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn generic() -> Self {
        Self::new(GENERIC_FAILURE)
    }

    /// Chat bubble text
    pub fn bubble(&self) -> String {
        format!("Error: {}", self.detail)
    }
}
