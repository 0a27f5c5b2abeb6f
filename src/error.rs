// src/error.rs
use std::time::Duration;

use thiserror::Error;

pub const NETWORK_UNAVAILABLE_MESSAGE: &str =
    "Could not connect to the backend. Check that the backend service is running.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred while sending the message.";

/// Failure of a single chat exchange. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP succeeded but the payload carried an `error` field.
    #[error("{0}")]
    BackendReported(String),

    #[error("{message}")]
    BackendStatus { status: u16, message: String },

    #[error("{}", NETWORK_UNAVAILABLE_MESSAGE)]
    NetworkUnavailable,

    #[error("The backend did not respond within {0:?}.")]
    Timeout(Duration),

    #[error("Request cancelled.")]
    Cancelled,

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Unknown,
}

pub type TransportResult<T> = Result<T, TransportError>;

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::InvalidResponse(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            TransportError::NetworkUnavailable
        } else {
            TransportError::Unknown
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value {value:?} for {key}: expected a positive number of seconds")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
