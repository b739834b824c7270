//! AWS Signature Version 4 signing.
//!
//! [`SigningContext`] captures the credentials, scope and clock reading for
//! one request, so the `X-Amz-Date` value and the credential scope date can
//! never disagree. The signing key is derived once per context.

use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::credentials::Credentials;

/// Algorithm name sent in the string to sign and the `Authorization` header.
pub const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

const SCOPE_TERMINATOR: &str = "aws4_request";

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded SHA-256 of `payload`.
///
/// ```
/// use cloudstate_auth::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Raw HMAC-SHA256 of `data` under `key`.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the per-day signing key.
///
/// The secret, prefixed with `AWS4`, keys an HMAC over the date; each result
/// keys the next HMAC over the region, the service and finally
/// `aws4_request`.
///
/// ```
/// use cloudstate_auth::derive_signing_key;
///
/// let key = derive_signing_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", "20120215", "us-east-1", "iam");
/// assert_eq!(
///     hex::encode(key),
///     "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
/// );
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    [region, service, SCOPE_TERMINATOR].iter().fold(
        hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes()),
        |key, part| hmac_sha256(&key, part.as_bytes()),
    )
}

/// Signing inputs for a single request.
#[derive(Clone)]
pub struct SigningContext {
    access_key_id: String,
    signing_key: Vec<u8>,
    date_stamp: String,
    amz_timestamp: String,
    scope: String,
}

impl SigningContext {
    /// Capture the signing inputs for a request issued at `now`.
    #[must_use]
    pub fn new(credentials: &Credentials, region: &str, service: &str, now: DateTime<Utc>) -> Self {
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let signing_key =
            derive_signing_key(credentials.secret_access_key(), &date_stamp, region, service);
        let scope = format!("{date_stamp}/{region}/{service}/{SCOPE_TERMINATOR}");

        Self {
            access_key_id: credentials.access_key_id().to_owned(),
            signing_key,
            date_stamp,
            amz_timestamp,
            scope,
        }
    }

    /// `YYYYMMDD`, as used in the credential scope.
    #[must_use]
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// `YYYYMMDDTHHMMSSZ`, as sent in `X-Amz-Date`.
    #[must_use]
    pub fn amz_timestamp(&self) -> &str {
        &self.amz_timestamp
    }

    /// `date/region/service/aws4_request`.
    #[must_use]
    pub fn credential_scope(&self) -> &str {
        &self.scope
    }

    /// The string to sign for `canonical_request`.
    #[must_use]
    pub fn string_to_sign(&self, canonical_request: &str) -> String {
        format!(
            "{SIGNING_ALGORITHM}\n{}\n{}\n{}",
            self.amz_timestamp,
            self.scope,
            hash_payload(canonical_request.as_bytes())
        )
    }

    /// Hex signature over `canonical_request`.
    #[must_use]
    pub fn signature(&self, canonical_request: &str) -> String {
        let string_to_sign = self.string_to_sign(canonical_request);
        debug!(string_to_sign = %string_to_sign, "Built string to sign");
        hex::encode(hmac_sha256(&self.signing_key, string_to_sign.as_bytes()))
    }

    /// Full `Authorization` header value for `canonical_request`.
    #[must_use]
    pub fn authorization_header(&self, canonical_request: &str, signed_headers: &str) -> String {
        format!(
            "{SIGNING_ALGORITHM} Credential={}/{}, SignedHeaders={signed_headers}, Signature={}",
            self.access_key_id,
            self.scope,
            self.signature(canonical_request)
        )
    }
}

impl fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningContext")
            .field("access_key_id", &self.access_key_id)
            .field("signing_key", &"<redacted>")
            .field("amz_timestamp", &self.amz_timestamp)
            .field("scope", &self.scope)
            .finish()
    }
}
