//! Integration tests for CloudState.
//!
//! These tests require a DynamoDB-compatible endpoint (LocalStack or
//! DynamoDB Local) at `localhost:4566`. They are marked `#[ignore]` so
//! they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p cloudstate-integration -- --ignored
//! ```

use std::sync::Once;

use chrono::Utc;
use cloudstate_auth::Credentials;
use cloudstate_auth::canonical::{SIGNED_HEADERS, build_canonical_request, build_signed_headers_string};
use cloudstate_auth::{SigningContext, hash_payload};
use cloudstate_core::request::CONTENT_TYPE;
use cloudstate_core::{StateClient, StoreConfig};
use cloudstate_http::HttpTransport;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the store.
fn endpoint_url() -> String {
    std::env::var("CLOUDSTATE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

fn test_credentials() -> Credentials {
    Credentials::new("test", "test").unwrap()
}

/// Configuration pointing at the local endpoint.
#[must_use]
pub fn test_config(table_name: &str, item_key: &str) -> StoreConfig {
    StoreConfig {
        table_name: table_name.to_owned(),
        item_key: item_key.to_owned(),
        partition_attribute: "game_id".to_owned(),
        endpoint_url: Some(endpoint_url()),
        ..StoreConfig::default()
    }
}

/// Create a state client for `config`.
#[must_use]
pub fn state_client(config: StoreConfig) -> StateClient<HttpTransport> {
    init_tracing();
    let transport = HttpTransport::from_config(&config).unwrap();
    StateClient::new(config, test_credentials(), transport).unwrap()
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Send a signed control-plane call (`CreateTable`, `DeleteTable`) that the
/// state client itself never issues.
async fn signed_call(operation: &str, body: &serde_json::Value) -> reqwest::Response {
    let config = test_config("unused", "unused");
    let uri = config.endpoint().unwrap();
    let host = uri.authority().unwrap().as_str().to_owned();
    let body = body.to_string();

    let creds = test_credentials();
    let ctx = SigningContext::new(&creds, &config.region, &config.service, Utc::now());
    let signed_headers = build_signed_headers_string(&SIGNED_HEADERS);
    let canonical = build_canonical_request(
        "POST",
        "/",
        "",
        &[
            ("content-type", CONTENT_TYPE),
            ("host", &host),
            ("x-amz-date", ctx.amz_timestamp()),
        ],
        &signed_headers,
        &hash_payload(body.as_bytes()),
    );

    reqwest::Client::new()
        .post(uri.to_string())
        .header("content-type", CONTENT_TYPE)
        .header("x-amz-date", ctx.amz_timestamp())
        .header(
            "authorization",
            ctx.authorization_header(&canonical, &signed_headers),
        )
        .header("x-amz-target", format!("DynamoDB_20120810.{operation}"))
        .body(body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("{operation} failed: {e}"))
}

/// Create a table keyed by a string `game_id` and return its name.
pub async fn create_state_table(prefix: &str) -> String {
    init_tracing();
    let name = test_table_name(prefix);
    let response = signed_call(
        "CreateTable",
        &serde_json::json!({
            "TableName": name,
            "KeySchema": [{ "AttributeName": "game_id", "KeyType": "HASH" }],
            "AttributeDefinitions": [{ "AttributeName": "game_id", "AttributeType": "S" }],
            "BillingMode": "PAY_PER_REQUEST"
        }),
    )
    .await;
    assert!(
        response.status().is_success(),
        "failed to create table {name}: {}",
        response.text().await.unwrap_or_default()
    );
    name
}

/// Delete a table, ignoring failures.
pub async fn cleanup_table(name: &str) {
    let _ = signed_call("DeleteTable", &serde_json::json!({ "TableName": name })).await;
}

mod test_state;
