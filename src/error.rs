// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the API client and the views built on it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// A success-shaped response that carries a refusal instead of the entity.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Message supplied by the API body, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            ClientError::Rejected(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// API message when present, otherwise the given fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.api_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
