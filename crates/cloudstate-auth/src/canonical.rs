//! Canonical request construction for AWS Signature Version 4.
//!
//! The canonical request has the following shape:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! where every canonical header line is terminated by its own `\n`, which is
//! why a blank line separates the headers from the signed header list.
//!
//! Headers are emitted in the order the caller supplies them. The signed
//! header list must name the same headers in the same order; both are fixed
//! for the DynamoDB JSON protocol (see [`SIGNED_HEADERS`]).

/// The signed headers used for every DynamoDB JSON request, in canonical order.
pub const SIGNED_HEADERS: [&str; 3] = ["content-type", "host", "x-amz-date"];

/// Build the full canonical request string from its components.
///
/// `headers` are `(lowercase-name, value)` pairs in canonical order.
///
/// # Examples
///
/// ```
/// use cloudstate_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "POST",
///     "/",
///     "",
///     &[("host", "dynamodb.us-east-1.amazonaws.com")],
///     "host",
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("POST\n/\n\nhost:dynamodb.us-east-1.amazonaws.com\n\nhost\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    let canonical_headers = build_canonical_headers(headers);

    format!("{method}\n{uri}\n{query_string}\n{canonical_headers}\n{signed_headers}\n{payload_hash}")
}

/// Build the canonical headers block: one `name:value\n` line per header, in
/// the given order.
///
/// Values are trimmed and runs of whitespace collapse to a single space.
///
/// # Examples
///
/// ```
/// use cloudstate_auth::canonical::build_canonical_headers;
///
/// let block = build_canonical_headers(&[
///     ("content-type", "application/x-amz-json-1.0"),
///     ("x-amz-date", "20150830T123600Z"),
/// ]);
/// assert_eq!(block, "content-type:application/x-amz-json-1.0\nx-amz-date:20150830T123600Z\n");
/// ```
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)]) -> String {
    headers.iter().fold(String::new(), |mut acc, (name, value)| {
        acc.push_str(name);
        acc.push(':');
        acc.push_str(&collapse_whitespace(value));
        acc.push('\n');
        acc
    })
}

/// Join header names into the `SignedHeaders` value without reordering them.
///
/// # Examples
///
/// ```
/// use cloudstate_auth::canonical::{SIGNED_HEADERS, build_signed_headers_string};
///
/// assert_eq!(build_signed_headers_string(&SIGNED_HEADERS), "content-type;host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    signed_headers.join(";")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigv4::hash_payload;

    const DYNAMODB_HOST: &str = "dynamodb.us-east-1.amazonaws.com";

    #[test]
    fn test_should_keep_caller_header_order() {
        let block = build_canonical_headers(&[("x-amz-date", "1"), ("content-type", "2")]);
        assert_eq!(block, "x-amz-date:1\ncontent-type:2\n");
    }

    #[test]
    fn test_should_collapse_whitespace_in_header_values() {
        let block = build_canonical_headers(&[("host", "  example.com  "), ("x-custom", "a   b")]);
        assert_eq!(block, "host:example.com\nx-custom:a b\n");
    }

    #[test]
    fn test_should_not_sort_signed_headers() {
        assert_eq!(build_signed_headers_string(&["b", "a"]), "b;a");
        assert_eq!(
            build_signed_headers_string(&SIGNED_HEADERS),
            "content-type;host;x-amz-date"
        );
    }

    #[test]
    fn test_should_build_canonical_request_for_get_item() {
        let body = r#"{"TableName":"games_state","Key":{"game_id":{"S":"level-1"}}}"#;
        let payload_hash = hash_payload(body.as_bytes());
        assert_eq!(
            payload_hash,
            "2718550e16b03d7cf914e4fcc47993e0bd859c3adb3c4c6322de96062454261d"
        );

        let canonical = build_canonical_request(
            "POST",
            "/",
            "",
            &[
                ("content-type", "application/x-amz-json-1.0"),
                ("host", DYNAMODB_HOST),
                ("x-amz-date", "20150830T123600Z"),
            ],
            "content-type;host;x-amz-date",
            &payload_hash,
        );

        let expected = "POST\n\
                        /\n\
                        \n\
                        content-type:application/x-amz-json-1.0\n\
                        host:dynamodb.us-east-1.amazonaws.com\n\
                        x-amz-date:20150830T123600Z\n\
                        \n\
                        content-type;host;x-amz-date\n\
                        2718550e16b03d7cf914e4fcc47993e0bd859c3adb3c4c6322de96062454261d";
        assert_eq!(canonical, expected);
        assert_eq!(
            hash_payload(canonical.as_bytes()),
            "a5478cf797ccd403fadfe881053a4d0957b0d723e4c66d7fed0bd88229b6dde3"
        );
    }
}
