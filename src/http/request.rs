//! Request context and request identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Carry the per-request facts the dispatcher needs as one immutable value
//!
//! # Design Decisions
//! - Request ID added as early as possible, propagated back on the response
//! - `raw_path` keeps the trailing slash exactly as sent; `path` is the
//!   canonical project-relative path used for lookups

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Per-request immutable bundle handed to path handlers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: Method,
    /// Percent-decoded request path as sent, trailing slash preserved.
    pub raw_path: String,
    /// Project-relative path: prefix stripped, dot segments resolved, no
    /// leading or trailing slash.
    pub path: String,
    /// Name of the project the request was routed to.
    pub project_name: String,
    /// The project was selected by the Host header rather than a path prefix.
    pub is_custom_host: bool,
    /// Host header value, port included.
    pub host: Option<String>,
    /// Raw query string.
    pub query: Option<String>,
    /// Request headers.
    pub headers: HeaderMap,
    /// Classified as an ordinary top-level browser navigation.
    pub is_browser_navigation: bool,
}

impl RequestContext {
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn has_origin(&self) -> bool {
        self.headers.contains_key(header::ORIGIN)
    }

    pub fn has_referer(&self) -> bool {
        self.headers.contains_key(header::REFERER)
    }

    /// Value of query parameter `name`, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| {
                percent_encoding::percent_decode_str(&value.replace('+', " "))
                    .decode_utf8_lossy()
                    .into_owned()
            })
        })
    }

    /// Value of cookie `name`.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .find_map(|pair| {
                let (key, value) = pair.trim().split_once('=')?;
                (key == name).then_some(value)
            })
    }
}
