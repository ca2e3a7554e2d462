//! Ordered content handler chain.
//!
//! # Responsibilities
//! - Offer a resolved, access-checked resource to each handler in order
//! - Contain handler failures: an error or panic is logged and counted as a decline
//!
//! # Design Decisions
//! - Registered once at startup, never mutated per request
//! - A failing handler never stops later handlers from being tried

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::response::Response;
use thiserror::Error;

use crate::handlers::static_file::StaticFileHandler;
use crate::http::request::RequestContext;
use crate::observability::metrics;
use crate::project::PathInfo;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

/// Produces responses for resolved resources.
pub trait ContentHandler: Send + Sync {
    fn name(&self) -> &str;

    /// Extensions of pages this handler renders; plain browser navigations
    /// may open them directly.
    fn page_extensions(&self) -> &[&'static str] {
        &[]
    }

    /// `Ok(None)` declines the resource.
    ///
    /// `canonical_path` is the authoritative name of the resource: the request
    /// path, or the request path joined with the index name.
    fn process(
        &self,
        info: &PathInfo,
        canonical_path: &str,
        ctx: &RequestContext,
        extra_headers: &HeaderMap,
    ) -> Result<Option<Response>, HandlerError>;
}

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn ContentHandler>>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Arc<dyn ContentHandler>>) -> Self {
        Self { handlers }
    }

    /// Chain holding only the static file handler.
    pub fn with_defaults() -> Self {
        Self::new(vec![Arc::new(StaticFileHandler)])
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Page extensions declared by every handler.
    pub fn page_extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers
            .iter()
            .flat_map(|handler| handler.page_extensions().iter().copied())
    }

    /// First handler response, or `None` if every handler declined or failed.
    pub fn dispatch(
        &self,
        info: &PathInfo,
        canonical_path: &str,
        ctx: &RequestContext,
        extra_headers: &HeaderMap,
    ) -> Option<Response> {
        for handler in &self.handlers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                handler.process(info, canonical_path, ctx, extra_headers)
            }));

            match outcome {
                Ok(Ok(Some(response))) => return Some(response),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    tracing::error!(
                        handler = handler.name(),
                        path = %canonical_path,
                        error = %e,
                        "Content handler failed"
                    );
                    metrics::record_handler_failure(handler.name());
                }
                Err(payload) => {
                    tracing::error!(
                        handler = handler.name(),
                        path = %canonical_path,
                        panic = panic_message(payload.as_ref()),
                        "Content handler panicked"
                    );
                    metrics::record_handler_failure(handler.name());
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|handler| handler.name()))
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
