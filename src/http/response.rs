//! Response helpers.
//!
//! Every terminal outcome carries the extra headers produced by token
//! validation, so all constructors take them.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Attach `extra` to `response`, replacing same-named headers.
pub fn with_headers(mut response: Response, extra: &HeaderMap) -> Response {
    response.headers_mut().extend(extra.clone());
    response
}

/// Empty-bodied response with the status' canonical reason as text.
pub fn status(code: StatusCode, extra: &HeaderMap) -> Response {
    let body = code.canonical_reason().unwrap_or_default();
    with_headers((code, body).into_response(), extra)
}

pub fn not_found() -> Response {
    status(StatusCode::NOT_FOUND, &HeaderMap::new())
}

pub fn not_found_with_message(message: &'static str, extra: &HeaderMap) -> Response {
    with_headers((StatusCode::NOT_FOUND, message).into_response(), extra)
}

/// 301 to `location`.
pub fn redirect(location: &str, extra: &HeaderMap) -> Response {
    let value = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "Invalid redirect location");
            return status(StatusCode::BAD_REQUEST, extra);
        }
    };

    let mut response = with_headers(StatusCode::MOVED_PERMANENTLY.into_response(), extra);
    response.headers_mut().insert(header::LOCATION, value);
    response
}
