// src/services/response.rs
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{TransportError, TransportResult};
use crate::message::ChatResponse;

/// Unwrap a 2xx `/chat` body into the reply text.
///
/// An `error` field in the payload wins over the HTTP status.
pub fn interpret_success(body: &[u8]) -> TransportResult<String> {
    let parsed: ChatResponse = serde_json::from_slice(body)
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

    match parsed.reported_error() {
        Some(reason) => Err(TransportError::BackendReported(reason.to_string())),
        None => Ok(parsed.response.unwrap_or_default()),
    }
}

/// Turn a non-2xx reply into an error, preferring the reason the backend gave.
pub fn interpret_failure(status: StatusCode, body: &[u8]) -> TransportError {
    let reason = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| extract_error_reason(&value));

    let message = reason.unwrap_or_else(|| {
        format!(
            "Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    });

    TransportError::BackendStatus {
        status: status.as_u16(),
        message,
    }
}

// `error` as a string, then `error.message`, then top-level `message`.
fn extract_error_reason(value: &Value) -> Option<String> {
    let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_owned);

    value
        .get("error")
        .and_then(non_empty)
        .or_else(|| value.pointer("/error/message").and_then(non_empty))
        .or_else(|| value.get("message").and_then(non_empty))
}
