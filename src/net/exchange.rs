//! Exchange client: one request/response round trip with the assistant.
//!
//! DESIGN
//! ======
//! `ExchangeClient` is the seam between the conversation controller and the
//! network. `HttpExchange` is the production implementation; tests drive the
//! controller with scripted clients instead.
//!
//! A single attempt per call. No retry, no streaming, and no timeout beyond
//! whatever the transport itself enforces.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses, and unparseable bodies all collapse
//! into [`ExchangeError::ExchangeFailed`]. The status code is kept when there
//! was one so callers can log it, but nothing branches on it.

#[cfg(test)]
#[path = "exchange_test.rs"]
mod exchange_test;

use std::fmt::Display;

use super::types::{ChatRequest, ChatResponse};

// =============================================================================
// ERROR
// =============================================================================

/// The one failure kind an exchange can surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    #[error("Failed to send message: {description}")]
    ExchangeFailed {
        description: String,
        status: Option<u16>,
    },
}

impl ExchangeError {
    /// The request never produced a response.
    pub fn transport(cause: impl Display) -> Self {
        Self::ExchangeFailed {
            description: format!("request could not be sent: {cause}"),
            status: None,
        }
    }

    /// The endpoint answered with a non-2xx status.
    #[must_use]
    pub fn http_status(status: u16, reason: &str) -> Self {
        let description = if reason.is_empty() {
            format!("API request failed with status: {status}")
        } else {
            format!("API request failed with status: {status} - {reason}")
        };
        Self::ExchangeFailed { description, status: Some(status) }
    }

    /// The endpoint answered 2xx with a body that is not a chat response.
    pub fn malformed(cause: impl Display) -> Self {
        Self::ExchangeFailed {
            description: format!("response body was not valid: {cause}"),
            status: None,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::ExchangeFailed { description, .. } => description,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ExchangeFailed { status, .. } => *status,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Sends one chat request and waits for the complete reply.
#[async_trait::async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Perform a single exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::ExchangeFailed`] on transport failure, a
    /// non-2xx status, or a malformed response body.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError>;
}

/// JSON-over-HTTP exchange against a fixed endpoint.
pub struct HttpExchange {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpExchange {
    /// Build a client for `endpoint` (the full URL of the chat route).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, endpoint: endpoint.into() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ExchangeClient for HttpExchange {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError> {
        tracing::debug!(
            session_id = %request.session_id,
            table = %request.table,
            message_len = request.message.len(),
            endpoint = %self.endpoint,
            "sending chat payload"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ExchangeError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response.text().await.map_err(ExchangeError::transport)?;
        serde_json::from_str::<ChatResponse>(&body).map_err(ExchangeError::malformed)
    }
}
