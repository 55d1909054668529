//! Error taxonomy for every client operation.

use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// A non-2xx answer from the backend, as seen at the fetch boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    pub message: String,
    pub status: u16,
    /// Parsed response body, `{}` when it was not JSON.
    pub body: Value,
    pub endpoint: String,
    pub had_auth_header: bool,
}

impl HttpFailure {
    /// Build a failure from a parsed error body. The message is taken from
    /// `body.error`, then `body.message`, then falls back to `HTTP <status>`.
    pub fn from_body(status: u16, body: Value, endpoint: &str, had_auth_header: bool) -> Self {
        let message = body_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
        Self {
            message,
            status,
            body,
            endpoint: endpoint.to_string(),
            had_auth_header,
        }
    }
}

/// First non-empty string among `error` and `message`.
pub(crate) fn body_message(body: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed argument, raised before any I/O.
    #[error("{0}")]
    Validation(String),

    #[error("network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("{}", .0.message)]
    Http(HttpFailure),

    /// The backend rejected the bearer token. The session has already been
    /// cleared; `redirecting` is set once the host was told to go to login.
    #[error("{}", .failure.message)]
    AuthExpired {
        failure: HttpFailure,
        redirecting: bool,
    },

    #[error("{message}")]
    Permission {
        message: String,
        status: u16,
        body: Value,
    },

    /// Every class-list route failed; one diagnostic per route, in try order.
    #[error("Unable to load classes: {}", .diagnostics.join(" | "))]
    Discovery { diagnostics: Vec<String> },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http(f) => Some(f.status),
            ApiError::AuthExpired { failure, .. } => Some(failure.status),
            ApiError::Permission { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the host has been asked to navigate to the login page.
    /// Callers must not retry such errors.
    pub fn is_redirecting(&self) -> bool {
        matches!(self, ApiError::AuthExpired { redirecting: true, .. })
    }
}

impl From<ApiError> for JsValue {
    fn from(err: ApiError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_error_then_message_then_status() {
        let f = HttpFailure::from_body(400, json!({"error": "bad", "message": "m"}), "/x", false);
        assert_eq!(f.message, "bad");
        let f = HttpFailure::from_body(400, json!({"message": "m"}), "/x", false);
        assert_eq!(f.message, "m");
        let f = HttpFailure::from_body(502, json!({}), "/x", true);
        assert_eq!(f.message, "HTTP 502");
        assert!(f.had_auth_header);
    }

    #[test]
    fn discovery_error_joins_diagnostics() {
        let err = ApiError::Discovery {
            diagnostics: vec!["a: 404".into(), "b: 500".into()],
        };
        assert_eq!(err.to_string(), "Unable to load classes: a: 404 | b: 500");
    }
}
