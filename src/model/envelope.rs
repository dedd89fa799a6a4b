use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::erx::{Erx, ResultE};

/// Every key the backend has been seen to wrap a list in.
pub const LIST_KEYS: &[&str] = &[
    "courses",
    "enrolledCourses",
    "categories",
    "studentDetails",
    "students",
    "lectures",
    "topics",
    "data",
    "items",
];

/// Keys a count endpoint may answer with instead of a list.
pub const COUNT_KEYS: &[&str] = &["count", "total", "totalCourses", "totalStudents"];

/// Accepted wire shapes for a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Object keys that may hold the list, checked in order.
    pub keys: &'static [&'static str],
    /// Treat a lone object without any list key as a one-item list.
    pub single: bool,
}

impl Shape {
    pub const LIST: Shape = Shape { keys: LIST_KEYS, single: false };

    pub const fn keyed(keys: &'static [&'static str]) -> Shape {
        Shape { keys, single: false }
    }

    pub const fn or_single(self) -> Shape {
        Shape { keys: self.keys, single: true }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::LIST
    }
}

/// Map any accepted response shape to a flat list.
///
/// * bare array → the array
/// * object with one of `shape.keys` holding an array → that array
/// * `null` → empty
/// * other objects → one item when `shape.single`, otherwise empty
///
/// Elements that do not decode as `T` are skipped and logged.
pub fn normalize<T: DeserializeOwned>(value: Value, shape: Shape) -> ResultE<Vec<T>> {
    let elements = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(mut map) => {
            let key = shape.keys.iter().find(|k| map.get(**k).is_some_and(Value::is_array));
            match key {
                Some(key) => match map.remove(*key) {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                None if shape.single && !map.is_empty() => vec![Value::Object(map)],
                None => {
                    warn!("response object has none of the list keys {:?}", shape.keys);
                    Vec::new()
                },
            }
        },
        other => {
            return Err(Erx::decode(&format!("expected a list response, got {}", kind(&other))));
        },
    };

    let total = elements.len();
    let decoded: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value::<T>(element) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("skipping malformed element {} of {}: {}", index, total, e);
                None
            },
        })
        .collect();

    Ok(decoded)
}

/// Read a count: bare array length, a number, or `{ count | total | .. }`,
/// falling back to the length of a wrapped list.
pub fn count(value: &Value) -> ResultE<usize> {
    match value {
        Value::Array(items) => Ok(items.len()),
        Value::Number(n) => {
            let n = n.as_u64().ok_or_else(|| Erx::decode("count is not a non-negative integer"))?;
            Ok(n as usize)
        },
        Value::Object(map) => {
            if let Some(n) = COUNT_KEYS.iter().find_map(|k| map.get(*k).and_then(Value::as_u64)) {
                return Ok(n as usize);
            }
            let wrapped = LIST_KEYS.iter().find_map(|k| map.get(*k).and_then(Value::as_array));
            if let Some(items) = wrapped {
                return Ok(items.len());
            }
            Ok(0)
        },
        Value::Null => Ok(0),
        other => Err(Erx::decode(&format!("expected a count response, got {}", kind(other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
