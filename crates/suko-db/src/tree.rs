//! Operations on the JSON tree.
//!
//! The tree never stores `null` or empty objects: writing `null` removes a
//! node, and parents left empty are removed with it.

use serde_json::{Map, Value};

/// Value at `segments`, if any.
pub(crate) fn get_at<'a>(node: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = node;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// Replace the value at `segments`.
///
/// Returns whether the tree changed.
pub(crate) fn set_at(node: &mut Value, segments: &[String], value: Value) -> bool {
    let value = normalize(value);
    if get_at(node, segments) == (!value.is_null()).then_some(&value) {
        return false;
    }
    write(node, segments, value);
    true
}

fn write(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    let mut now_empty = false;
    if let Some(map) = node.as_object_mut() {
        let remove_child = {
            let child = map.entry(head.clone()).or_insert(Value::Null);
            write(child, rest, value);
            child.is_null()
        };
        if remove_child {
            map.remove(head);
        }
        now_empty = map.is_empty();
    }
    if now_empty {
        *node = Value::Null;
    }
}

/// Drop nulls and empty objects, recursively. An object that ends up empty
/// becomes `null`.
pub(crate) fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !v.is_null())
                .collect();
            if cleaned.is_empty() {
                Value::Null
            } else {
                Value::Object(cleaned)
            }
        }
        other => other,
    }
}
