//! HTTP transport seam.
//!
//! [`Transport`] sends one request and returns the raw status and body;
//! interpretation (auth retry, error normalization, decoding) lives in
//! [`ApiClient`](super::ApiClient). The browser build uses [`HttpTransport`],
//! tests substitute an in-memory transport.

use std::cell::Cell;
use std::rc::Rc;

use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;

use crate::config::FETCH_TIMEOUT_MS;
use crate::core::ApiError;
use crate::utils::url::build_url;

/// HTTP method of an [`ApiRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A REST call relative to the API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Access token attached as `Authorization: Bearer ...`.
    pub bearer: Option<String>,
    /// Skip the refresh-and-retry cycle on 401 (auth endpoints).
    pub anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Mark as a request made without credentials.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Query parameter value, for logging and tests.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests. Only failures to obtain a response are errors here;
/// non-2xx statuses are returned as responses.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        (**self).send(request).await
    }
}

// =============================================================================
// Browser transport
// =============================================================================

/// Fetch-based transport with a per-request timeout.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    timeout_ms: u32,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let url = build_url(&self.base_url, &request.path, &request.query);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        }
        .header("Accept", "application/json");

        match &request.bearer {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let controller = web_sys::AbortController::new()
            .map_err(|_| ApiError::Network("unable to create request".to_string()))?;
        let timed_out = Rc::new(Cell::new(false));

        let builder = self
            .builder(request)
            .abort_signal(Some(&controller.signal()));
        let prepared = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        // Dropping the timer on completion cancels it.
        let _timer = {
            let timed_out = timed_out.clone();
            Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let outcome = async {
            let response = prepared.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, gloo_net::Error>(ApiResponse::new(status, body))
        }
        .await;

        outcome.map_err(|e| {
            if timed_out.get() {
                ApiError::Network("request timed out".to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })
    }
}
