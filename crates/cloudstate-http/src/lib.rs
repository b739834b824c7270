//! HTTP transport for CloudState, backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use cloudstate_core::{
    RequestEnvelope, StateError, StateResult, StoreConfig, Transport, TransportError,
    TransportResponse,
};
use tracing::debug;

/// Sends signed envelopes with a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout.
    pub fn new(timeout: Duration) -> StateResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StateError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Create a transport using the configured request timeout.
    pub fn from_config(config: &StoreConfig) -> StateResult<Self> {
        Self::new(config.request_timeout())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .request(envelope.method().clone(), envelope.uri().to_string())
            .headers(envelope.headers().clone())
            .body(envelope.body().clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        debug!(
            operation = %envelope.operation(),
            %status,
            bytes = body.len(),
            "Received response"
        );

        Ok(TransportResponse::new(status, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}
