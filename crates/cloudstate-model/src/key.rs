//! Composite item keys and the owner-scope encoding.
//!
//! A stored state table maps flat string keys to values. When records are
//! namespaced per installation, every flat key starts with a fixed-width
//! owner scope: a 6-character base-62 token derived from the time the
//! installation first ran.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of an encoded owner scope.
pub const OWNER_SCOPE_LEN: usize = 6;

/// Base-62 alphabet: digits, then uppercase, then lowercase.
const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Padding used for owner scopes and short namespaced keys.
const SCOPE_PAD: &str = "000000";

/// Identity of one entry in a state table.
///
/// Equality and hashing cover exactly the two string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    owner_scope: String,
    local_key: String,
}

impl ItemKey {
    /// Create a key from an owner scope (empty when not namespaced) and a
    /// local key.
    #[must_use]
    pub fn new(owner_scope: impl Into<String>, local_key: impl Into<String>) -> Self {
        Self {
            owner_scope: owner_scope.into(),
            local_key: local_key.into(),
        }
    }

    /// Create a key with no owner scope.
    #[must_use]
    pub fn unscoped(local_key: impl Into<String>) -> Self {
        Self::new(String::new(), local_key)
    }

    /// Split a stored flat key back into its parts.
    ///
    /// Without namespacing the whole key is the local key. With namespacing,
    /// keys shorter than seven characters are first left-padded with
    /// `"000000"`; the first six characters then form the owner scope and
    /// the remainder the local key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudstate_model::ItemKey;
    ///
    /// assert_eq!(ItemKey::from_flat("ABCDEF1", true), ItemKey::new("ABCDEF", "1"));
    /// assert_eq!(ItemKey::from_flat("xy", true), ItemKey::new("000000", "xy"));
    /// assert_eq!(ItemKey::from_flat("xy", false), ItemKey::unscoped("xy"));
    /// ```
    #[must_use]
    pub fn from_flat(flat: &str, namespaced: bool) -> Self {
        if !namespaced {
            return Self::unscoped(flat);
        }

        let padded = if flat.chars().count() <= OWNER_SCOPE_LEN {
            format!("{SCOPE_PAD}{flat}")
        } else {
            flat.to_owned()
        };

        let split_at = padded
            .char_indices()
            .nth(OWNER_SCOPE_LEN)
            .map_or(padded.len(), |(idx, _)| idx);
        let (scope, local) = padded.split_at(split_at);
        Self::new(scope, local)
    }

    /// The owner scope; empty when not namespaced.
    #[must_use]
    pub fn owner_scope(&self) -> &str {
        &self.owner_scope
    }

    /// The key within the owner scope.
    #[must_use]
    pub fn local_key(&self) -> &str {
        &self.local_key
    }

    /// The storage form: owner scope immediately followed by the local key.
    #[must_use]
    pub fn flat_key(&self) -> String {
        format!("{}{}", self.owner_scope, self.local_key)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner_scope, self.local_key)
    }
}

/// Encode a millisecond timestamp as a fixed-width owner scope.
///
/// The value is written in base 62, most significant digit first. Results
/// longer than six characters keep their first six; shorter results are
/// left-padded with `0`.
///
/// # Examples
///
/// ```
/// use cloudstate_model::encode_owner_scope;
///
/// assert_eq!(encode_owner_scope(0), "000000");
/// assert_eq!(encode_owner_scope(62), "000010");
/// ```
#[must_use]
pub fn encode_owner_scope(epoch_millis: u64) -> String {
    let mut digits = Vec::new();
    let mut value = epoch_millis;
    loop {
        // value % 62 < 62, so the index is in range.
        #[allow(clippy::cast_possible_truncation)]
        digits.push(BASE62_ALPHABET[(value % 62) as usize]);
        value /= 62;
        if value == 0 {
            break;
        }
    }

    let encoded: String = digits
        .iter()
        .rev()
        .take(OWNER_SCOPE_LEN)
        .map(|&b| char::from(b))
        .collect();
    format!("{encoded:0>width$}", width = OWNER_SCOPE_LEN)
}

/// Generate the owner scope for an installation first seen at `now`.
#[must_use]
pub fn generate_owner_scope(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    encode_owner_scope(millis)
}
