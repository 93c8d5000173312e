//! Structured error types for backend requests.

use thiserror::Error;

/// Errors raised while talking to the dashboard backend.
///
/// `Server` carries a message the backend put in an `error` body field;
/// everything else is transport or shape trouble on our side of the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("server error: {0}")]
    Server(String),

    #[error("unexpected response format: {0}")]
    ResponseFormat(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
