//! Response-shape normalisation. The backend has answered list calls with a
//! bare array, `{classes: [...]}`, `{students: [...]}` and `{data: [...]}`
//! depending on the deployment; callers only ever see the canonical shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical class-list shape handed to UI code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassList {
    pub classes: Vec<Value>,
}

/// Accepts a bare array, `.classes` or `.data`. Anything else is an empty
/// list rather than an error.
pub fn normalize_class_list(payload: Value) -> ClassList {
    let classes = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("classes") {
            Some(Value::Array(items)) => items,
            _ => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
        },
        _ => Vec::new(),
    };
    ClassList { classes }
}

/// Accepts `.students` or a bare array; anything else is empty.
pub fn extract_students(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("students") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Parse a response body, substituting `{}` for anything that is not JSON.
pub fn parse_lenient(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()))
}
