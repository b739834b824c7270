//! Error types for SigV4 signing.

/// Errors raised while loading or validating signing credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The access key ID is empty.
    #[error("access key id must not be empty")]
    EmptyAccessKey,

    /// The secret access key is empty.
    #[error("secret access key must not be empty")]
    EmptySecretKey,

    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(String),
}
