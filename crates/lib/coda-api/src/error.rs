use std::string::FromUtf8Error;

use thiserror::Error;

/// Failure talking to the remote document API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response body is not text: {0}")]
    NotText(#[from] FromUtf8Error),
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Builds a status error, preferring the `message` field of a JSON body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());
        Self::Status { status, message }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
