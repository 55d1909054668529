//! Key/value persistence used by the session store, the route memory and
//! the local caches.
//!
//! Storage is best-effort: browsers may disable `sessionStorage` /
//! `localStorage` (private mode, quota, sandboxed iframes). Reads that fail
//! look like a missing key, writes that fail are logged and dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStore;
    use crate::warn_log;

    /// `window.sessionStorage` or `window.localStorage`.
    pub struct BrowserStorage {
        storage: Option<web_sys::Storage>,
        label: &'static str,
    }

    impl BrowserStorage {
        /// Per-tab storage, used for the bearer session.
        pub fn session() -> Self {
            let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
            Self::wrap(storage, "sessionStorage")
        }

        /// Durable storage, used for route memory and list caches.
        pub fn local() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
            Self::wrap(storage, "localStorage")
        }

        fn wrap(storage: Option<web_sys::Storage>, label: &'static str) -> Self {
            if storage.is_none() {
                warn_log!("{} unavailable – falling back to no persistence", label);
            }
            Self { storage, label }
        }
    }

    impl KeyValueStore for BrowserStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.storage.as_ref()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) {
            if let Some(storage) = &self.storage {
                if let Err(e) = storage.set_item(key, value) {
                    warn_log!("{}: failed to write {}: {:?}", self.label, key, e);
                }
            }
        }

        fn remove(&self, key: &str) {
            if let Some(storage) = &self.storage {
                if let Err(e) = storage.remove_item(key) {
                    warn_log!("{}: failed to remove {}: {:?}", self.label, key, e);
                }
            }
        }
    }
}
