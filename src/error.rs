//! Error types for scanning and configuration

use thiserror::Error;

/// Banner text shown when the entry tree has no condition with a left operand.
pub const VALIDATION_MESSAGE: &str = "Add at least one entry condition with an indicator selected.";

const FALLBACK_MESSAGE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    /// Non-success response; `message` is the raw response body.
    #[error("{}", api_message(.message))]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

fn api_message(body: &str) -> &str {
    if body.trim().is_empty() {
        FALLBACK_MESSAGE
    } else {
        body
    }
}

impl ScanError {
    /// Text for the single user-facing error channel. Timeouts, connection
    /// failures and 4xx/5xx bodies all end up here without distinction.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API url: {0}")]
    InvalidUrl(String),

    #[error("Invalid edit mode '{0}', expected 'immediate' or 'commit'")]
    InvalidEditMode(String),
}
