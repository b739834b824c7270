//! Signed request construction for `PutItem` and `GetItem`.
//!
//! Both operations share one pipeline and differ only in body and target:
//!
//! 1. Capture the timestamp and date stamp from one instant.
//! 2. Build the JSON body and hash it.
//! 3. Build the canonical request with the fixed signed headers
//!    `content-type;host;x-amz-date`, path `/` and an empty query.
//! 4. Sign it and assemble the envelope headers.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use cloudstate_auth::canonical::{SIGNED_HEADERS, build_canonical_request, build_signed_headers_string};
use cloudstate_auth::{Credentials, SigningContext, hash_payload};
use cloudstate_model::StoreOperation;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StateError, StateResult};
use crate::payload::{build_read_payload, build_write_payload};

/// Content type for DynamoDB JSON requests.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_TARGET: &str = "x-amz-target";

/// A fully signed request, ready for a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    operation: StoreOperation,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestEnvelope {
    /// The operation this request performs.
    #[must_use]
    pub fn operation(&self) -> StoreOperation {
        self.operation
    }

    /// Endpoint the request is posted to.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Always `POST`.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// `Content-Type`, `X-Amz-Date`, `Authorization` and `X-Amz-Target`.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// JSON body bytes; exactly what was hashed for the signature.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Builds signed envelopes for one configured store.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credentials: Credentials,
    endpoint: Uri,
    host: String,
    table_name: String,
    partition_attribute: String,
    region: String,
    service: String,
    target_prefix: String,
    api_version: String,
}

impl RequestBuilder {
    /// Create a builder, validating the configuration up front.
    pub fn new(config: &StoreConfig, credentials: Credentials) -> StateResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let host = endpoint
            .authority()
            .map(|a| a.as_str().to_owned())
            .ok_or_else(|| StateError::Configuration("endpoint has no host".to_owned()))?;

        Ok(Self {
            credentials,
            endpoint,
            host,
            table_name: config.table_name.clone(),
            partition_attribute: config.partition_attribute.clone(),
            region: config.region.clone(),
            service: config.service.clone(),
            target_prefix: config.target_prefix.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// The `host` value that is signed.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build a signed `PutItem` storing `data` under `partition_value`.
    pub fn build_put_item(
        &self,
        partition_value: &str,
        data: &str,
        now: DateTime<Utc>,
    ) -> StateResult<RequestEnvelope> {
        let body = build_write_payload(
            &self.table_name,
            &self.partition_attribute,
            partition_value,
            data,
        )?;
        self.sign(StoreOperation::PutItem, body, now)
    }

    /// Build a signed `GetItem` reading the item under `partition_value`.
    pub fn build_get_item(
        &self,
        partition_value: &str,
        now: DateTime<Utc>,
    ) -> StateResult<RequestEnvelope> {
        let body = build_read_payload(&self.table_name, &self.partition_attribute, partition_value)?;
        self.sign(StoreOperation::GetItem, body, now)
    }

    fn sign(
        &self,
        operation: StoreOperation,
        body: String,
        now: DateTime<Utc>,
    ) -> StateResult<RequestEnvelope> {
        let ctx = SigningContext::new(&self.credentials, &self.region, &self.service, now);
        let payload_hash = hash_payload(body.as_bytes());
        let signed_headers = build_signed_headers_string(&SIGNED_HEADERS);

        let canonical_request = build_canonical_request(
            Method::POST.as_str(),
            "/",
            "",
            &[
                ("content-type", CONTENT_TYPE),
                ("host", &self.host),
                (X_AMZ_DATE, ctx.amz_timestamp()),
            ],
            &signed_headers,
            &payload_hash,
        );

        debug!(%operation, canonical_request = %canonical_request, "Built canonical request");

        let authorization = ctx.authorization_header(&canonical_request, &signed_headers);
        let target = operation.target(&self.target_prefix, &self.api_version);

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
        headers.insert(
            HeaderName::from_static(X_AMZ_DATE),
            header_value(ctx.amz_timestamp())?,
        );
        headers.insert(http::header::AUTHORIZATION, header_value(&authorization)?);
        headers.insert(HeaderName::from_static(X_AMZ_TARGET), header_value(&target)?);

        Ok(RequestEnvelope {
            operation,
            uri: self.endpoint.clone(),
            method: Method::POST,
            headers,
            body: Bytes::from(body),
        })
    }
}

fn header_value(value: &str) -> StateResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| StateError::Configuration(format!("invalid header value: {value}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn builder(config: &StoreConfig) -> RequestBuilder {
        let creds =
            Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY").unwrap();
        RequestBuilder::new(config, creds).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    fn header<'a>(envelope: &'a RequestEnvelope, name: &str) -> &'a str {
        envelope.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_should_sign_get_item_with_known_signature() {
        let envelope = builder(&StoreConfig::default())
            .build_get_item("level-1", fixed_now())
            .unwrap();

        assert_eq!(envelope.method(), Method::POST);
        assert_eq!(envelope.uri().to_string(), "https://dynamodb.us-east-1.amazonaws.com/");
        assert_eq!(
            envelope.body().as_ref(),
            br#"{"TableName":"games_state","Key":{"game_id":{"S":"level-1"}}}"#
        );
        assert_eq!(header(&envelope, "content-type"), CONTENT_TYPE);
        assert_eq!(header(&envelope, "x-amz-date"), "20150830T123600Z");
        assert_eq!(header(&envelope, "x-amz-target"), "DynamoDB_20120810.GetItem");
        assert_eq!(
            header(&envelope, "authorization"),
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/dynamodb/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, \
             Signature=b94ec91af71fa8794745282acce5768f9fcec2af9daee39acbce96becfb64ff3"
        );
    }

    #[test]
    fn test_should_build_put_item_with_put_target() {
        let envelope = builder(&StoreConfig::default())
            .build_put_item("level-1", "alice,120", fixed_now())
            .unwrap();

        assert_eq!(envelope.operation(), StoreOperation::PutItem);
        assert_eq!(header(&envelope, "x-amz-target"), "DynamoDB_20120810.PutItem");

        let body: serde_json::Value = serde_json::from_slice(envelope.body()).unwrap();
        assert_eq!(body["Item"]["Data"]["S"], "alice,120");
        assert_eq!(body["Item"]["game_id"]["S"], "level-1");

        let authorization = header(&envelope, "authorization");
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/dynamodb/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, Signature="
        ));
        let signature = authorization.rsplit_once("Signature=").unwrap().1;
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_should_produce_identical_envelopes_for_identical_inputs() {
        let b = builder(&StoreConfig::default());
        let first = b.build_put_item("k", "a,1", fixed_now()).unwrap();
        let second = b.build_put_item("k", "a,1", fixed_now()).unwrap();
        assert_eq!(first.headers(), second.headers());
        assert_eq!(first.body(), second.body());
    }

    #[test]
    fn test_should_change_signature_when_body_changes() {
        let b = builder(&StoreConfig::default());
        let first = b.build_put_item("k", "a,1", fixed_now()).unwrap();
        let second = b.build_put_item("k", "a,2", fixed_now()).unwrap();
        assert_ne!(header(&first, "authorization"), header(&second, "authorization"));
    }

    #[test]
    fn test_should_sign_endpoint_override_host() {
        let config = StoreConfig {
            endpoint_url: Some("http://localhost:4566".to_owned()),
            ..StoreConfig::default()
        };
        let b = builder(&config);
        assert_eq!(b.host(), "localhost:4566");
        let envelope = b.build_get_item("k", fixed_now()).unwrap();
        assert_eq!(envelope.uri().authority().unwrap().as_str(), "localhost:4566");
    }

    #[test]
    fn test_should_fail_fast_on_invalid_config() {
        let config = StoreConfig {
            table_name: String::new(),
            ..StoreConfig::default()
        };
        let creds = Credentials::new("AKID", "secret").unwrap();
        assert!(matches!(
            RequestBuilder::new(&config, creds),
            Err(StateError::Configuration(_))
        ));
    }
}
