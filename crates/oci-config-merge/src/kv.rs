//! `KEY=VALUE` parsing shared by environment variables and labels.

use std::collections::BTreeMap;

/// Split on the first `=`.
///
/// Everything after the first `=` (further `=` included) is the value. A
/// string without `=` is all key with an empty value.
pub fn parse_key_value(entry: &str) -> (&str, &str) {
    entry.split_once('=').unwrap_or((entry, ""))
}

/// Parse a list of `KEY=VALUE` entries into a map. Later duplicates win.
pub fn parse_pairs<S: AsRef<str>>(entries: &[S]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|entry| {
            let (key, value) = parse_key_value(entry.as_ref());
            (key.to_string(), value.to_string())
        })
        .collect()
}
