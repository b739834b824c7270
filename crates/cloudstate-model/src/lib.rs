//! DynamoDB wire types and item key model for CloudState.
//!
//! Only the slice of the DynamoDB JSON protocol that CloudState speaks is
//! modelled here: `PutItem` and `GetItem` against a table keyed by a single
//! string partition key. The types are hand-written since DynamoDB's JSON
//! protocol makes serde derives trivial.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]

pub mod attribute_value;
pub mod input;
pub mod key;
pub mod operations;
pub mod output;

pub use attribute_value::AttributeValue;
pub use input::{GetItemInput, PutItemInput};
pub use key::{ItemKey, OWNER_SCOPE_LEN, encode_owner_scope, generate_owner_scope};
pub use operations::StoreOperation;
pub use output::{GetItemOutput, ServiceErrorBody};
