//! DynamoDB operations issued by CloudState.

use std::fmt;

/// Default `X-Amz-Target` service prefix.
pub const DEFAULT_TARGET_PREFIX: &str = "DynamoDB";

/// Default DynamoDB JSON API version.
pub const DEFAULT_API_VERSION: &str = "20120810";

/// The operations CloudState sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Put (insert or replace) an item.
    PutItem,
    /// Get an item by primary key.
    GetItem,
}

impl StoreOperation {
    /// Returns the AWS operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PutItem => "PutItem",
            Self::GetItem => "GetItem",
        }
    }

    /// The `X-Amz-Target` header value, e.g. `DynamoDB_20120810.PutItem`.
    #[must_use]
    pub fn target(&self, prefix: &str, api_version: &str) -> String {
        format!("{prefix}_{api_version}.{}", self.as_str())
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
