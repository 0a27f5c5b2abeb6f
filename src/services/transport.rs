// src/services/transport.rs
use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::response::{interpret_failure, interpret_success};
use crate::config::TransportConfig;
use crate::error::{ConfigError, TransportError, TransportResult};
use crate::message::ChatRequest;

/// Per-call overrides for [`ChatTransport::send_message_with`].
#[derive(Debug, Default, Clone)]
pub struct SendOptions {
    /// Replaces the configured request timeout for this call.
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl SendOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// HTTP transport to the chat backend.
///
/// Build one at startup and share it (by reference or `Arc`); cloning is cheap
/// and clones share the same connection pool. Holds no per-call state, so
/// concurrent sends are independent of each other.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    http: Client,
    chat_url: Url,
    health_url: Url,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl ChatTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, ConfigError> {
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            chat_url: config.endpoint("chat")?,
            health_url: config.endpoint("health")?,
            request_timeout: config.request_timeout,
            health_timeout: config.health_timeout,
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Send one message and return the assistant's reply.
    pub async fn send_message(&self, message: &str) -> TransportResult<String> {
        self.send_message_with(message, SendOptions::default()).await
    }

    pub async fn send_message_with(
        &self,
        message: &str,
        options: SendOptions,
    ) -> TransportResult<String> {
        let timeout = options.timeout.unwrap_or(self.request_timeout);
        debug!(url = %self.chat_url, chars = message.chars().count(), "sending chat message");

        let bounded = async {
            tokio::time::timeout(timeout, self.exchange(message))
                .await
                .unwrap_or(Err(TransportError::Timeout(timeout)))
        };

        let outcome = match options.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        };

        match &outcome {
            Ok(reply) => info!(chars = reply.chars().count(), "chat reply received"),
            Err(TransportError::BackendStatus { status, message }) => {
                warn!(status, reason = %message, "backend rejected chat message")
            }
            Err(err) => warn!(error = %err, "chat message failed"),
        }
        outcome
    }

    async fn exchange(&self, message: &str) -> TransportResult<String> {
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            interpret_success(&body)
        } else {
            Err(interpret_failure(status, &body))
        }
    }

    /// `true` iff `/health` answers 2xx within the health timeout. Never fails.
    pub async fn check_health(&self) -> bool {
        let probe = self.http.get(self.health_url.clone()).send();

        match tokio::time::timeout(self.health_timeout, probe).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    debug!(%status, "backend healthy");
                    true
                } else {
                    warn!(%status, "backend health check returned non-success status");
                    false
                }
            }
            Ok(Err(err)) => {
                warn!(error = %err, "backend health check failed");
                false
            }
            Err(_) => {
                warn!(timeout = ?self.health_timeout, "backend health check timed out");
                false
            }
        }
    }
}
