//! JSON → schema conversion.
//!
//! # Design
//! Wire keys arrive in arbitrary casing (`publicUrl`, `Name`, `ID`). Before
//! serde sees a value, `normalize_keys` lower-cases every object key
//! recursively so schema fields only ever match one spelling. Values are left
//! untouched.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{DocsError, Result};
use crate::types::Schema;

/// Lower-case every object key in `value`, descending into nested objects
/// and arrays.
///
/// When two keys collide after lower-casing, the one that comes later in the
/// object wins; object maps keep wire order (`preserve_order`).
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let normalized: Map<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), normalize_keys(value)))
                .collect();
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Build a `T` from a JSON object. `null` yields `None`.
pub fn parse<T: Schema>(value: Value) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    trace!(schema = T::NAME, "deserializing record");
    let record = serde_json::from_value(normalize_keys(value))
        .map_err(|e| DocsError::Deserialization(format!("{}: {e}", T::NAME)))?;
    Ok(Some(record))
}

/// Build a `T` from each element of a JSON array, preserving order.
///
/// Fails on the first element that does not convert, including `null`
/// elements, and on a non-array input.
pub fn parse_list<T: Schema>(value: Value) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(DocsError::Deserialization(format!(
            "{}: expected an array of items",
            T::NAME
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            parse::<T>(item)?.ok_or_else(|| {
                DocsError::Deserialization(format!("{}: null item at index {index}", T::NAME))
            })
        })
        .collect()
}
