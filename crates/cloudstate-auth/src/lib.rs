//! AWS Signature Version 4 request signing for CloudState.
//!
//! This crate implements the client side of SigV4: given a request body, the
//! target host and a set of credentials, it produces the `Authorization`
//! header value a DynamoDB-compatible endpoint expects.
//!
//! # Overview
//!
//! Signing happens in four steps:
//!
//! 1. Build the canonical request from the method, path, query, headers and
//!    the SHA-256 hash of the payload.
//! 2. Build the string to sign from the timestamp, credential scope and the
//!    hash of the canonical request.
//! 3. Derive a per-day, per-region, per-service signing key from the secret
//!    key with an HMAC-SHA256 chain.
//! 4. HMAC the string to sign with that key and format the header.
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cloudstate_auth::{Credentials, SigningContext};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")?;
//! let now = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
//! let ctx = SigningContext::new(&credentials, "us-east-1", "dynamodb", now);
//!
//! assert_eq!(ctx.date_stamp(), "20150830");
//! assert_eq!(ctx.amz_timestamp(), "20150830T123600Z");
//! # Ok::<(), cloudstate_auth::AuthError>(())
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction with a fixed header order
//! - [`credentials`] - Access key / secret key pair
//! - [`error`] - Authentication error types
//! - [`sigv4`] - Hashing, key derivation and the signing context

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod sigv4;

pub use credentials::Credentials;
pub use error::AuthError;
pub use sigv4::{SigningContext, derive_signing_key, hash_payload, hmac_sha256};
