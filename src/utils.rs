//! Utility helpers shared across the client.

use serde_json::Value;

use crate::errors::ApiError;

/// Current timestamp in **milliseconds** since UNIX epoch.
///
/// `chrono` reads `Date.now()` under WASM (via the `wasmbind` feature) and
/// the system clock natively, so the session logic is testable off-browser.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a class identifier supplied by the UI layer.
pub fn parse_class_id(raw: &str) -> Result<i64, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Class ID is required"));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("Class ID must be numeric, got '{}'", trimmed)))
}

/// Largest integer a JS number holds exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Text form of a class id passed as a JS number. Only exact integers are
/// rendered as such; anything else keeps its float form so that
/// `parse_class_id` rejects it.
pub fn class_id_from_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Trimmed, non-empty required string argument.
pub fn require<'a>(value: &'a str, what: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::validation(format!("{} is required", what)))
    } else {
        Ok(trimmed)
    }
}

/// Faculty number of a student record, under either naming convention.
/// Numbers are accepted and rendered as strings.
pub fn faculty_number(student: &Value) -> Option<String> {
    ["faculty_number", "facultyNumber"]
        .iter()
        .filter_map(|k| student.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
