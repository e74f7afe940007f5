//! Chat error types.

use thiserror::Error;

/// Errors that can occur while serving a chat call.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Caller input was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// No provider resolves, or the active one lacks its credential
    #[error("{0}")]
    Configuration(String),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Outbound call could not complete
    #[error("{0}")]
    Network(#[from] reqwest::Error),
}

impl ChatError {
    /// HTTP status code the error maps to on the public surface.
    pub fn status_code(&self) -> u16 {
        match self {
            ChatError::Validation(_) => 400,
            ChatError::Configuration(_) | ChatError::Upstream { .. } | ChatError::Network(_) => {
                500
            }
        }
    }
}
