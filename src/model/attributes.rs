//! Attribute-map helpers shared by query options and group updates.

use serde_json::{Map, Value};

/// Shallow merge of two attribute maps.
///
/// Keys present in `new` replace the values in `old`; keys only in `old`
/// survive. Nested objects are replaced whole, not merged.
pub fn merge_attributes(old: &Map<String, Value>, new: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = old.clone();
    for (key, value) in new {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Options passed to a remote query, e.g. `{"profile": "story", "limit": 10}`.
pub type QueryOptions = Map<String, Value>;
