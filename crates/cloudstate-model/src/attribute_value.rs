//! Typed attribute values as they appear on the wire.
//!
//! Each value is a single-key object naming its type, e.g. `{"S": "hello"}`.
//! CloudState only ever writes strings. Reads keep every other type opaque so
//! an unexpected item shape can be reported instead of failing to decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

type WireForm = BTreeMap<String, Value>;

/// A DynamoDB attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireForm", into = "WireForm")]
pub enum AttributeValue {
    /// `S`: a string.
    S(String),
    /// `N`: a number, kept in its string form.
    N(String),
    /// Any other type, with its descriptor and raw JSON payload.
    Other {
        /// Type descriptor, e.g. `BOOL` or `M`.
        descriptor: String,
        /// Raw payload.
        value: Value,
    },
}

impl AttributeValue {
    /// The string value of an `S` attribute.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// The number string of an `N` attribute.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// The wire type descriptor (`S`, `N`, `BOOL`, ...).
    #[must_use]
    pub fn type_descriptor(&self) -> &str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::Other { descriptor, .. } => descriptor,
        }
    }
}

impl TryFrom<WireForm> for AttributeValue {
    type Error = String;

    fn try_from(wire: WireForm) -> Result<Self, Self::Error> {
        if wire.len() != 1 {
            return Err(format!(
                "attribute value must have exactly one type key, found {}",
                wire.len()
            ));
        }
        let Some((descriptor, value)) = wire.into_iter().next() else {
            return Err("empty attribute value".to_owned());
        };

        match (descriptor.as_str(), value) {
            ("S", Value::String(s)) => Ok(Self::S(s)),
            ("N", Value::String(n)) => Ok(Self::N(n)),
            ("S" | "N", other) => Err(format!(
                "{descriptor} attribute must be a JSON string, found {other}"
            )),
            (_, value) => Ok(Self::Other { descriptor, value }),
        }
    }
}

impl From<AttributeValue> for WireForm {
    fn from(value: AttributeValue) -> Self {
        let (descriptor, payload) = match value {
            AttributeValue::S(s) => ("S".to_owned(), Value::String(s)),
            AttributeValue::N(n) => ("N".to_owned(), Value::String(n)),
            AttributeValue::Other { descriptor, value } => (descriptor, value),
        };
        BTreeMap::from([(descriptor, payload)])
    }
}
