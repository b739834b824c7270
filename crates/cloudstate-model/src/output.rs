//! DynamoDB operation output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// Output for the `GetItem` operation.
///
/// DynamoDB answers `{}` when the key does not exist, so `item` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// A map of attribute names to `AttributeValue` objects for the retrieved
    /// item. Returns `None` if the item does not exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<BTreeMap<String, AttributeValue>>,
}

/// JSON error document returned with non-2xx responses.
///
/// ```json
/// {
///   "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
///   "message": "Requested resource not found"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    /// Fully-qualified error type.
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,
    /// Human-readable message. DynamoDB uses both `message` and `Message`.
    #[serde(alias = "Message", default)]
    pub message: Option<String>,
}

impl ServiceErrorBody {
    /// The short error code, i.e. the part of `__type` after `#`.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_type
            .as_deref()
            .map(|t| t.rsplit_once('#').map_or(t, |(_, code)| code))
    }
}
