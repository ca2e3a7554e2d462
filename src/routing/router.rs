//! Top-level path handler chain.
//!
//! # Responsibilities
//! - Store top-level path handlers in registration order
//! - Offer each matched request to them in turn
//! - Answer 404 when none of them handles it
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Explicit `Unhandled` rather than a silent default response

use std::sync::Arc;

use axum::response::Response;

use crate::http::request::RequestContext;
use crate::http::response;
use crate::project::ProjectContext;

/// Outcome of offering a request to a path handler.
#[derive(Debug)]
pub enum Dispatch {
    Handled(Response),
    Unhandled,
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled(_))
    }
}

/// A top-level handler for project-relative request paths.
pub trait PathHandler: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, ctx: &RequestContext, project: &ProjectContext) -> Dispatch;
}

/// Ordered list of top-level path handlers.
#[derive(Clone, Default)]
pub struct PathRouter {
    handlers: Vec<Arc<dyn PathHandler>>,
}

impl PathRouter {
    pub fn new(handlers: Vec<Arc<dyn PathHandler>>) -> Self {
        Self { handlers }
    }

    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|handler| handler.name())
    }

    /// First handled response, or 404.
    pub fn route(&self, ctx: &RequestContext, project: &ProjectContext) -> Response {
        for handler in &self.handlers {
            if let Dispatch::Handled(response) = handler.process(ctx, project) {
                return response;
            }
            tracing::trace!(handler = handler.name(), path = %ctx.path, "Path handler declined");
        }

        tracing::debug!(project = project.name(), path = %ctx.path, "No path handler matched");
        response::not_found()
    }
}

impl std::fmt::Debug for PathRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handler_names()).finish()
    }
}
