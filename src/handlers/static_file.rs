//! Static file content handler.

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::handlers::chain::{ContentHandler, HandlerError};
use crate::http::request::RequestContext;
use crate::http::response;
use crate::project::{PathInfo, Resource};

/// Serves file bytes as they are, typed by the canonical path's extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFileHandler;

impl ContentHandler for StaticFileHandler {
    fn name(&self) -> &str {
        "static"
    }

    fn page_extensions(&self) -> &[&'static str] {
        &["html", "htm", "shtml", "stm", "shtm"]
    }

    fn process(
        &self,
        info: &PathInfo,
        canonical_path: &str,
        ctx: &RequestContext,
        extra_headers: &HeaderMap,
    ) -> Result<Option<Response>, HandlerError> {
        if ctx.method != Method::GET && ctx.method != Method::HEAD {
            return Ok(None);
        }
        if info.is_directory() {
            return Ok(None);
        }

        let body = match (info.local_path(), info.resource()) {
            (Some(path), _) => std::fs::read(path)?,
            (None, Resource::Virtual(file)) => match file.content() {
                Some(content) => content.to_vec(),
                None => return Ok(None),
            },
            (None, Resource::Local(_)) => return Ok(None),
        };

        let mime = mime_guess::from_path(canonical_path).first_or_octet_stream();
        let content_type = HeaderValue::from_str(mime.as_ref())
            .map_err(|e| HandlerError::Internal(format!("invalid content type {mime}: {e}")))?;

        let mut response = (StatusCode::OK, body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, content_type);
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("private, no-cache"));

        Ok(Some(response::with_headers(response, extra_headers)))
    }
}
