//! Error types for CloudState operations.

use cloudstate_auth::AuthError;

use crate::transport::TransportError;

/// Core error type for saving and fetching state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Missing or invalid configuration or credentials. Raised before any
    /// network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The store answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Transport {
        /// HTTP status returned by the store.
        status: http::StatusCode,
        /// Short service error code (e.g. `ResourceNotFoundException`), if
        /// the body carried one.
        code: Option<String>,
        /// Service message or raw response body.
        message: String,
    },

    /// The request never produced a response.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// The response body does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The owner scope store could not be read or written.
    #[error("owner scope store error: {0}")]
    Store(String),
}

impl StateError {
    /// Whether this error came from the transport layer or a non-success
    /// response, as opposed to local validation or decoding.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Network(_))
    }
}

impl From<AuthError> for StateError {
    fn from(e: AuthError) -> Self {
        Self::Configuration(e.to_string())
    }
}

/// Convenience result type for CloudState operations.
pub type StateResult<T> = Result<T, StateError>;
