//! Error types for the generative content client.

use thiserror::Error;

use serde::Deserialize;

/// Errors from the generative API.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({error_type}): {message}")]
    Api {
        error_type: String,
        message: String,
    },

    /// Rate limited; retry after the given number of seconds.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Invalid API key.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
