//! Dense encoding for arrays of homogeneous objects.
//!
//! Descriptions are dominated by arrays of small records with identical keys
//! (properties, parameters, decorators, registration entries). Repeating the
//! keys in every element is the bulk of the payload, so such arrays are
//! rewritten column-header style:
//!
//! ```text
//! [{"n":"a","t":1},{"n":"b","t":2}]
//!   => {"$k":["n","t"],"$v":[["a",1],["b",2]]}
//! ```
//!
//! Only arrays of at least [`MIN_ROWS`] objects whose key lists match exactly
//! (same keys, same order) are rewritten. [`expand`] is the exact inverse.

use serde_json::{Map, Value};

pub const KEYS_FIELD: &str = "$k";
pub const VALUES_FIELD: &str = "$v";

/// Minimum number of elements before an array is worth compacting.
pub const MIN_ROWS: usize = 2;

/// Rewrite every homogeneous object array in `value`, innermost first.
pub fn compact(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().map(compact).collect();
            match homogeneous_keys(&items) {
                Some(keys) => encode_rows(keys, items),
                None => Value::Array(items),
            }
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, compact(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Undo [`compact`].
pub fn expand(value: Value) -> Value {
    match value {
        Value::Object(map) if is_encoded(&map) => {
            let mut map = map;
            let keys = match map.remove(KEYS_FIELD) {
                Some(Value::Array(keys)) => keys,
                _ => return Value::Object(map),
            };
            let rows = match map.remove(VALUES_FIELD) {
                Some(Value::Array(rows)) => rows,
                _ => return Value::Object(map),
            };
            let keys: Vec<String> = keys
                .into_iter()
                .filter_map(|k| match k {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();

            Value::Array(
                rows.into_iter()
                    .map(|row| decode_row(&keys, row))
                    .collect(),
            )
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, expand(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(expand).collect()),
        other => other,
    }
}

fn is_encoded(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.contains_key(KEYS_FIELD) && map.contains_key(VALUES_FIELD)
}

fn homogeneous_keys(items: &[Value]) -> Option<Vec<String>> {
    if items.len() < MIN_ROWS {
        return None;
    }

    let first = items.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    let keys: Vec<&String> = first.keys().collect();

    let same_shape = items.iter().all(|item| {
        item.as_object()
            .is_some_and(|obj| obj.len() == keys.len() && obj.keys().zip(&keys).all(|(a, b)| a == *b))
    });

    same_shape.then(|| keys.into_iter().cloned().collect())
}

fn encode_rows(keys: Vec<String>, items: Vec<Value>) -> Value {
    let rows: Vec<Value> = items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
            other => other,
        })
        .collect();

    let mut encoded = Map::new();
    encoded.insert(
        KEYS_FIELD.to_string(),
        Value::Array(keys.into_iter().map(Value::String).collect()),
    );
    encoded.insert(VALUES_FIELD.to_string(), Value::Array(rows));
    Value::Object(encoded)
}

fn decode_row(keys: &[String], row: Value) -> Value {
    match row {
        Value::Array(values) => Value::Object(
            keys.iter()
                .cloned()
                .zip(values.into_iter().map(expand))
                .collect(),
        ),
        other => expand(other),
    }
}

#[cfg(test)]
#[path = "../tests/short_array_tests.rs"]
mod tests;
