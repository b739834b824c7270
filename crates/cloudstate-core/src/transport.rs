//! Transport boundary.
//!
//! The core builds signed [`RequestEnvelope`]s and consumes responses; it
//! never owns a socket. Anything that can POST bytes over HTTPS implements
//! [`Transport`]. Retries, backoff and timeouts belong to the implementation.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::request::RequestEnvelope;

/// Failure to obtain any response at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: http::StatusCode,
    /// Raw response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: http::StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a signed request and returns the response.
///
/// Uses `#[async_trait]` so the client can hold transports behind `dyn`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the envelope exactly as built.
    async fn send(&self, envelope: &RequestEnvelope) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<TransportResponse, TransportError> {
        (**self).send(envelope).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<TransportResponse, TransportError> {
        (**self).send(envelope).await
    }
}
