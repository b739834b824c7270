//! DynamoDB operation input types.
//!
//! Field order matches the order DynamoDB documents them in, and maps are
//! `BTreeMap`s so a given input always serializes to the same bytes, which
//! keeps the signed payload hash reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// Input for the `PutItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    /// The name of the table to put the item into.
    pub table_name: String,

    /// A map of attribute name to attribute value, representing the item.
    pub item: BTreeMap<String, AttributeValue>,
}

/// Input for the `GetItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemInput {
    /// The name of the table containing the item.
    pub table_name: String,

    /// A map of attribute names to `AttributeValue` objects representing the
    /// primary key of the item to retrieve.
    pub key: BTreeMap<String, AttributeValue>,
}
