// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

// Every field may be missing or null; the `error` check must still run.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn reported_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }
}
