// Re-export network modules
pub mod api_client;
pub mod classifier;
pub mod config;
pub mod normalize;
pub mod retry;
pub mod routes;
pub mod transport;

// Re-export commonly used items
pub use api_client::ApiClient;
pub use classifier::{MutationErrorClassifier, SessionExpired};
pub use config::ApiConfig;
pub use normalize::ClassList;
pub use retry::{NoDelay, RetryPolicy, Sleeper};
pub use routes::{ClassRouteResolver, RouteCandidate, CLASS_ROUTES};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

use lazy_static::lazy_static;
use std::sync::RwLock;
use wasm_bindgen::prelude::*;

lazy_static! {
    static ref API_CONFIG: RwLock<Option<ApiConfig>> = RwLock::new(None);
}

/// Initialize the API configuration from the build-time `API_BASE_URL`.
pub fn init_api_config() {
    set_api_config(ApiConfig::new());
}

/// Initialize the API configuration from a JS-provided URL.
/// This allows runtime configuration of the API endpoints.
#[wasm_bindgen]
pub fn init_api_config_js(api_base_url: &str, login_url: Option<String>) {
    crate::debug_log!("Initializing API config from JS: {}", api_base_url);
    let mut config = ApiConfig::from_url(api_base_url);
    if let Some(login) = login_url {
        config = config.with_login_url(&login);
    }
    set_api_config(config);
}

fn set_api_config(config: ApiConfig) {
    // A poisoned lock only means a writer panicked mid-assignment of an
    // Option; the value is still usable.
    let mut guard = API_CONFIG.write().unwrap_or_else(|e| e.into_inner());
    *guard = Some(config);
}

/// Configured API settings. Until something is initialised this is the
/// build-time `API_BASE_URL` (same-origin when unset).
pub fn current_api_config() -> ApiConfig {
    configured_or_build_time(API_CONFIG.read().unwrap_or_else(|e| e.into_inner()).clone())
}

fn configured_or_build_time(slot: Option<ApiConfig>) -> ApiConfig {
    slot.unwrap_or_else(ApiConfig::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_config_replaces_default() {
        init_api_config_js("https://classes.example.edu/api/", Some("/signin".into()));
        let cfg = current_api_config();
        assert_eq!(cfg.base_url(), "https://classes.example.edu/api");
        assert_eq!(cfg.login_url(), "/signin");
    }

    #[test]
    fn empty_slot_uses_build_time_base_url() {
        let cfg = configured_or_build_time(None);
        assert_eq!(cfg, ApiConfig::new());
        assert_eq!(cfg.login_url(), "/login");

        let runtime = ApiConfig::from_url("https://x.edu");
        assert_eq!(configured_or_build_time(Some(runtime.clone())), runtime);
    }
}
