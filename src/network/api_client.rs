use std::rc::Rc;

use serde_json::Value;

use super::normalize::parse_lenient;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::debug_log;
use crate::errors::{ApiError, HttpFailure};
use crate::session::SessionStore;

/// JSON-over-HTTP client that attaches the session's bearer token.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn HttpTransport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send a request with `Content-Type: application/json` and, when a
    /// session token exists, `Authorization: Bearer <token>`.
    ///
    /// Returns the raw response plus whether the auth header was sent.
    pub async fn send_authenticated(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(HttpResponse, bool), ApiError> {
        let mut request =
            HttpRequest::new(method, url).header("Content-Type", "application/json");

        let had_auth_header = match self.session.token() {
            Some(token) => {
                request = request.header("Authorization", &format!("Bearer {}", token));
                true
            }
            None => false,
        };

        if let Some(data) = body {
            request = request.body(data.to_string());
        }

        debug_log!("{} {} (auth: {})", method, url, had_auth_header);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Network {
                endpoint: url.to_string(),
                message: e.to_string(),
            })?;
        Ok((response, had_auth_header))
    }

    /// Authenticated JSON call.
    ///
    /// The body is always parsed leniently (`{}` when it is not JSON). A
    /// non-2xx status becomes `ApiError::Http`; a 2xx body is returned as-is.
    pub async fn fetch_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let (parsed, _) = self.fetch_json_with_auth(method, url, body).await?;
        Ok(parsed)
    }

    /// Same as `fetch_json`, also reporting whether the bearer header was sent.
    pub async fn fetch_json_with_auth(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(Value, bool), ApiError> {
        let (response, had_auth_header) = self.send_authenticated(method, url, body).await?;
        let parsed = parse_lenient(&response.body);

        if !response.is_success() {
            return Err(ApiError::Http(HttpFailure::from_body(
                response.status,
                parsed,
                url,
                had_auth_header,
            )));
        }
        Ok((parsed, had_auth_header))
    }
}
