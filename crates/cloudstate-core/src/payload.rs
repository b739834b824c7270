//! JSON request bodies and response decoding for the state item.

use std::collections::BTreeMap;

use cloudstate_model::{AttributeValue, GetItemInput, GetItemOutput, PutItemInput, ServiceErrorBody};

use crate::error::{StateError, StateResult};

/// Attribute holding the serialized state table.
pub const DATA_ATTRIBUTE: &str = "Data";

/// Build the `PutItem` body storing `data` under `partition_value`.
///
/// The data string is embedded as a JSON string, so quotes, backslashes and
/// control characters are escaped.
///
/// # Examples
///
/// ```
/// use cloudstate_core::payload::build_write_payload;
///
/// let body = build_write_payload("games_state", "game_id", "level-1", "alice,\"120\"").unwrap();
/// assert_eq!(
///     body,
///     r#"{"TableName":"games_state","Item":{"Data":{"S":"alice,\"120\""},"game_id":{"S":"level-1"}}}"#
/// );
/// ```
pub fn build_write_payload(
    table_name: &str,
    partition_attribute: &str,
    partition_value: &str,
    data: &str,
) -> StateResult<String> {
    let mut item = BTreeMap::new();
    item.insert(
        partition_attribute.to_owned(),
        AttributeValue::S(partition_value.to_owned()),
    );
    item.insert(DATA_ATTRIBUTE.to_owned(), AttributeValue::S(data.to_owned()));

    let input = PutItemInput {
        table_name: table_name.to_owned(),
        item,
    };
    Ok(serde_json::to_string(&input)?)
}

/// Build the `GetItem` body reading the item under `partition_value`.
pub fn build_read_payload(
    table_name: &str,
    partition_attribute: &str,
    partition_value: &str,
) -> StateResult<String> {
    let mut key = BTreeMap::new();
    key.insert(
        partition_attribute.to_owned(),
        AttributeValue::S(partition_value.to_owned()),
    );

    let input = GetItemInput {
        table_name: table_name.to_owned(),
        key,
    };
    Ok(serde_json::to_string(&input)?)
}

/// Extract the stored data string from a `GetItem` response body.
///
/// Returns `Ok(None)` when the item, or its `Data` attribute, does not exist
/// yet. A body that is not a `GetItem` response, or a `Data` attribute that
/// is not a string, is a [`StateError::MalformedResponse`].
pub fn extract_data_field(body: &str) -> StateResult<Option<String>> {
    let output: GetItemOutput = serde_json::from_str(body)
        .map_err(|e| StateError::MalformedResponse(format!("invalid GetItem response: {e}")))?;

    let Some(mut item) = output.item else {
        return Ok(None);
    };

    match item.remove(DATA_ATTRIBUTE) {
        None => Ok(None),
        Some(AttributeValue::S(data)) => Ok(Some(data)),
        Some(other) => Err(StateError::MalformedResponse(format!(
            "expected {DATA_ATTRIBUTE} to be a string attribute, found {}",
            other.type_descriptor()
        ))),
    }
}

/// Turn a non-success response into a [`StateError::Transport`], decoding the
/// service's JSON error document when there is one.
#[must_use]
pub fn service_failure(status: http::StatusCode, body: &str) -> StateError {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(err) if err.error_type.is_some() || err.message.is_some() => StateError::Transport {
            status,
            code: err.code().map(ToOwned::to_owned),
            message: err.message.unwrap_or_default(),
        },
        _ => StateError::Transport {
            status,
            code: None,
            message: body.trim().to_owned(),
        },
    }
}
