//! Bearer-token session kept in per-tab storage.

use std::rc::Rc;

use serde_json::Value;

use crate::constants::{
    DEFAULT_SESSION_TTL_SECS, LEGACY_SESSION_KEYS, SESSION_EMAIL_KEY, SESSION_EXPIRES_AT_KEY,
    SESSION_PROFILE_KEY, SESSION_TOKEN_KEY,
};
use crate::debug_log;
use crate::errors::ApiError;
use crate::storage::KeyValueStore;
use crate::utils::now_ms;

/// Handle onto the session keys. Cloning is cheap and every clone sees the
/// same underlying storage.
#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Start a session. The token is trimmed; blank tokens are rejected.
    pub fn set_session(&self, token: &str, expires_at_ms: i64) -> Result<(), ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::validation("Session token must not be empty"));
        }
        self.remove_legacy_keys();
        self.store.set(SESSION_TOKEN_KEY, token);
        self.store
            .set(SESSION_EXPIRES_AT_KEY, &expires_at_ms.to_string());
        Ok(())
    }

    /// Start a session from a login response body.
    ///
    /// Accepts `token` or `access_token`, and `expires_at` (epoch ms) or
    /// `expires_in` (seconds). Without either, the session lasts one hour.
    /// A negative `expires_in` yields an already-expired session; huge values
    /// saturate instead of overflowing.
    pub fn set_session_from_response(&self, body: &Value) -> Result<(), ApiError> {
        let token = ["token", "access_token"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .ok_or_else(|| ApiError::validation("Login response did not contain a token"))?;

        let expires_at = match body.get("expires_at").and_then(Value::as_i64) {
            Some(at) => at,
            None => {
                let ttl = body
                    .get("expires_in")
                    .and_then(Value::as_i64)
                    .unwrap_or(DEFAULT_SESSION_TTL_SECS)
                    .max(0);
                now_ms().saturating_add(ttl.saturating_mul(1000))
            }
        };
        self.set_session(token, expires_at)
    }

    /// Raw stored token, trimmed. Does not look at the expiry.
    fn stored_token(&self) -> Option<String> {
        self.store
            .get(SESSION_TOKEN_KEY)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Current usable token. An expired session is cleared on read.
    pub fn token(&self) -> Option<String> {
        let token = self.stored_token()?;
        if self.is_expired() {
            debug_log!("Session token expired – clearing session");
            self.clear();
            return None;
        }
        Some(token)
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// True when no expiry is recorded or it has passed.
    pub fn is_expired(&self) -> bool {
        match self.expires_at_ms() {
            Some(at) => now_ms() >= at,
            None => true,
        }
    }

    pub fn expires_at_ms(&self) -> Option<i64> {
        self.store
            .get(SESSION_EXPIRES_AT_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }

    /// Drop every session key, including keys left by older builds.
    pub fn clear(&self) {
        self.store.remove(SESSION_TOKEN_KEY);
        self.store.remove(SESSION_EXPIRES_AT_KEY);
        self.store.remove(SESSION_PROFILE_KEY);
        self.store.remove(SESSION_EMAIL_KEY);
        self.remove_legacy_keys();
    }

    fn remove_legacy_keys(&self) {
        for key in LEGACY_SESSION_KEYS {
            self.store.remove(key);
        }
    }

    pub fn teacher_email(&self) -> Option<String> {
        self.store
            .get(SESSION_EMAIL_KEY)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
    }

    pub fn set_teacher_email(&self, email: &str) {
        self.store.set(SESSION_EMAIL_KEY, email.trim());
    }

    /// Cached teacher profile; a corrupt entry reads as absent.
    pub fn teacher_profile(&self) -> Option<Value> {
        self.store
            .get(SESSION_PROFILE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn set_teacher_profile(&self, profile: &Value) {
        self.store.set(SESSION_PROFILE_KEY, &profile.to_string());
    }
}
