use url::form_urlencoded::byte_serialize;

use crate::constants::DEFAULT_LOGIN_URL;

/// API route configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    // When empty the client assumes same-origin and builds relative URLs.
    base_url: String,
    login_url: String,
}

impl Default for ApiConfig {
    /// Same-origin configuration, ignoring `API_BASE_URL`.
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create a new ApiConfig from the API_BASE_URL environment variable
    pub fn new() -> Self {
        // Env var is optional – fall back to same-origin when missing.
        Self::from_url(option_env!("API_BASE_URL").unwrap_or(""))
    }

    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Page the host navigates to when the session expires.
    pub fn with_login_url(mut self, login_url: &str) -> Self {
        self.login_url = login_url.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Full URL for an endpoint path (no leading slash).
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn create_class(&self) -> String {
        self.url("create_class")
    }

    pub fn update_class(&self) -> String {
        self.url("update_class")
    }

    pub fn delete_class(&self) -> String {
        self.url("delete_class")
    }

    /// Shared endpoint for listing (GET) and adding (POST) class students.
    pub fn class_students(&self) -> String {
        self.url("class_students")
    }

    pub fn class_students_for(&self, class_id: i64) -> String {
        format!("{}?class_id={}", self.class_students(), class_id)
    }

    pub fn remove_student(&self) -> String {
        self.url("remove_student_from_class")
    }
}

/// Percent-encode a value for use in a query string or path segment.
pub(crate) fn encode(value: &str) -> String {
    // form encoding turns spaces into '+', which is not valid in a path.
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
