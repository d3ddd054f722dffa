//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the chat-completion provider
///
/// Any of these ends the current submission; tasks already emitted stay.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Build the error for a non-success HTTP status
    pub fn from_status(status: u16, retry_after: Option<&str>, body: String) -> Self {
        if status == 429 {
            let secs = retry_after.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(60);
            return LlmError::RateLimited {
                retry_after: Duration::from_secs(secs),
            };
        }
        LlmError::ApiError { status, message: body }
    }
}
