//! The HTTP seam. Everything above this module talks to a
//! `dyn HttpTransport`, so tests swap the browser `fetch` for a script.

use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure (DNS, refused connection, CORS rejection, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait HttpTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, TransportError>>;
}

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::*;
    use futures::FutureExt;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    /// Browser `fetch` transport.
    #[derive(Default)]
    pub struct FetchTransport;

    impl FetchTransport {
        pub fn new() -> Self {
            Self
        }

        async fn fetch(request: HttpRequest) -> Result<HttpResponse, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;

            // If the page is served over HTTPS but the URL is HTTP, upgrade it
            // to avoid mixed-content rejections. Localhost over HTTP is left alone.
            let mut effective_url = request.url.clone();
            if let Ok(protocol) = window.location().protocol() {
                if protocol == "https:" && effective_url.starts_with("http://") {
                    effective_url = effective_url.replacen("http://", "https://", 1);
                }
            }

            let opts = RequestInit::new();
            opts.set_method(request.method.as_str());
            opts.set_mode(RequestMode::Cors);

            let headers = Headers::new()?;
            for (name, value) in &request.headers {
                headers.append(name, value)?;
            }
            opts.set_headers(&headers);

            if let Some(body) = &request.body {
                opts.set_body(&JsValue::from_str(body));
            }

            let req = Request::new_with_str_and_init(&effective_url, &opts)?;
            let resp_value = JsFuture::from(window.fetch_with_request(&req)).await?;
            let resp: Response = resp_value.dyn_into()?;

            // A body that cannot be read is treated as empty; callers parse
            // defensively anyway.
            let body = match resp.text() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .ok()
                    .and_then(|v| v.as_string())
                    .unwrap_or_default(),
                Err(_) => String::new(),
            };

            Ok(HttpResponse {
                status: resp.status(),
                status_text: resp.status_text(),
                body,
            })
        }
    }

    impl HttpTransport for FetchTransport {
        fn send(
            &self,
            request: HttpRequest,
        ) -> LocalBoxFuture<'_, Result<HttpResponse, TransportError>> {
            async move {
                Self::fetch(request)
                    .await
                    .map_err(|e| TransportError(e.as_string().unwrap_or_else(|| format!("{:?}", e))))
            }
            .boxed_local()
        }
    }
}
