//! Flat text encoding of a state table.
//!
//! A table is stored as one `key,value` line per entry, joined with `\n`. Only
//! the first comma on a line separates key from value, so values may contain
//! commas; keys may not. Keys and values are trimmed when read back.
//!
//! ```text
//! ABCDEFalice,120
//! ABCDEFbob,95
//! ```

use std::cmp::Reverse;

use cloudstate_model::ItemKey;

use crate::state::StateMap;

/// Join `(flat_key, value)` pairs into the stored text form, in iteration order.
///
/// # Examples
///
/// ```
/// use cloudstate_core::codec::serialize_state;
///
/// let text = serialize_state([("alice", "120"), ("bob", "95")]);
/// assert_eq!(text, "alice,120\nbob,95");
/// ```
#[must_use]
pub fn serialize_state<I, K, V>(entries: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    entries
        .into_iter()
        .map(|(k, v)| format!("{},{}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten a table into `(owner_scope + local_key, value)` pairs.
#[must_use]
pub fn flatten_state(state: &StateMap) -> Vec<(String, String)> {
    state
        .iter()
        .map(|(key, value)| (key.flat_key(), value.to_owned()))
        .collect()
}

/// Encode a table into its stored text form.
#[must_use]
pub fn encode_state(state: &StateMap) -> String {
    serialize_state(flatten_state(state))
}

/// Parse the stored text form.
///
/// Lines without a comma are skipped. Parsing stops once `max_items` entries
/// have been read; a repeated key still counts towards the limit and its
/// later value wins. See [`ItemKey::from_flat`] for how namespaced keys split.
///
/// # Examples
///
/// ```
/// use cloudstate_core::codec::parse_state;
/// use cloudstate_model::ItemKey;
///
/// let state = parse_state("ABCDEF1,50\nxy,7", true, usize::MAX);
/// assert_eq!(state.get(&ItemKey::new("ABCDEF", "1")), Some("50"));
/// assert_eq!(state.get(&ItemKey::new("000000", "xy")), Some("7"));
/// ```
#[must_use]
pub fn parse_state(text: &str, namespaced: bool, max_items: usize) -> StateMap {
    let mut state = StateMap::new();
    if max_items == 0 {
        return state;
    }

    let mut parsed = 0usize;
    for line in text.split('\n') {
        let Some((key, value)) = line.split_once(',') else {
            continue;
        };

        state.insert(ItemKey::from_flat(key.trim(), namespaced), value.trim());
        parsed += 1;
        if parsed >= max_items {
            break;
        }
    }

    state
}

/// Order entries by their value read as an integer, highest first.
///
/// Values that do not parse count as `0`. Entries with equal scores keep
/// their original relative order.
#[must_use]
pub fn rank_by_numeric_value(state: &StateMap) -> Vec<(ItemKey, String)> {
    let mut ranked: Vec<(ItemKey, String)> = state
        .iter()
        .map(|(k, v)| (k.clone(), v.to_owned()))
        .collect();
    ranked.sort_by_key(|(_, value)| Reverse(numeric_value(value)));
    ranked
}

/// Rebuild a table in ranked order.
#[must_use]
pub fn rank_state(state: &StateMap) -> StateMap {
    rank_by_numeric_value(state).into_iter().collect()
}

fn numeric_value(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}
