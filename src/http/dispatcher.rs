//! Per-request resolution and dispatch.
//!
//! # Responsibilities
//! - Validate the access token
//! - Resolve the request path through the project's cache
//! - Substitute directory requests by their index resource
//! - Apply redirects, the disclosure gate and access control, in that order
//! - Hand the resource to the content handler chain
//!
//! # Data Flow
//! ```text
//! RequestContext + ProjectContext
//!     → TokenValidator            (reject: 401)
//!     → ProjectContext::resolve   (miss: 404 for the project root, else Unhandled)
//!     → IndexResolver             (directory without index: 404)
//!     → RedirectPolicy            (bare directory URL: 301)
//!     → DisclosureGate            (plain navigation to non-page: 404)
//!     → RedirectPolicy            (fallback resource for a directory: 301)
//!     → AccessGuard               (403, or 404 in safe mode)
//!     → HandlerChain              (response, or Unhandled)
//! ```
//!
//! # Design Decisions
//! - Every terminal response carries the token validation headers
//! - An unresolvable non-empty path is `Unhandled`, so later path handlers may
//!   still answer it
//! - Runs synchronously; the server calls it from a blocking task

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};

use crate::config::WebServerConfig;
use crate::handlers::HandlerChain;
use crate::http::request::RequestContext;
use crate::http::response;
use crate::observability::metrics;
use crate::project::{IndexResolver, ProjectContext};
use crate::routing::redirect::{ends_with_name, ends_with_slash};
use crate::routing::{Dispatch, PathHandler, RedirectPolicy};
use crate::security::{AccessGuard, ConfiguredTokenValidator, DisclosureGate, TokenValidator};

const INDEX_NOT_FOUND: &str = "Index file doesn't exist.";

/// Resolves project files and dispatches them to content handlers.
pub struct RequestDispatcher {
    tokens: Arc<dyn TokenValidator>,
    index: IndexResolver,
    redirects: RedirectPolicy,
    gate: DisclosureGate,
    guard: AccessGuard,
    handlers: HandlerChain,
}

impl RequestDispatcher {
    /// The disclosure gate allows the configured extensions plus every page
    /// extension declared by `handlers`.
    pub fn new(
        config: &WebServerConfig,
        tokens: Arc<dyn TokenValidator>,
        handlers: HandlerChain,
    ) -> Self {
        let gate = DisclosureGate::new(
            config
                .serve
                .directly_accessible
                .iter()
                .cloned()
                .chain(handlers.page_extensions().map(String::from)),
        );

        Self {
            tokens,
            index: IndexResolver::new(config.serve.index_files.clone()),
            redirects: RedirectPolicy,
            gate,
            guard: AccessGuard::new(config.serve.safe_mode),
            handlers,
        }
    }

    /// Dispatcher with the configured token validator and default handlers.
    pub fn from_config(config: &WebServerConfig) -> Self {
        Self::new(
            config,
            Arc::new(ConfiguredTokenValidator::new(&config.auth)),
            HandlerChain::with_defaults(),
        )
    }

    pub fn dispatch(&self, ctx: &RequestContext, project: &ProjectContext) -> Dispatch {
        let extra = match self.tokens.validate(ctx) {
            Ok(headers) => headers,
            Err(e) => {
                tracing::debug!(project = project.name(), path = %ctx.path, error = %e, "Token rejected");
                return Dispatch::Handled(response::status(StatusCode::UNAUTHORIZED, &HeaderMap::new()));
            }
        };

        if ctx.path.is_empty() && !ctx.is_custom_host && !ends_with_slash(&ctx.raw_path) {
            return self.redirect(ctx, &extra);
        }

        let Some(mut info) = project.resolve(&ctx.path) else {
            if ctx.path.is_empty() {
                return Dispatch::Handled(response::not_found_with_message(INDEX_NOT_FOUND, &extra));
            }
            return Dispatch::Unhandled;
        };

        let mut index_used = false;
        if info.is_directory() {
            let Some(index) = self.index.find_index(&info) else {
                tracing::debug!(project = project.name(), path = %ctx.path, "Directory has no index");
                return Dispatch::Handled(response::not_found_with_message(INDEX_NOT_FOUND, &extra));
            };
            if self.redirects.should_redirect_to_directory(ctx) {
                return self.redirect(ctx, &extra);
            }

            project.cache().store(&ctx.path, index.clone());
            info = index;
            index_used = true;
        }

        let name = info.name();
        if let Err(denial) = self.gate.check(ctx, &extra, &name) {
            metrics::record_access_denied(denial.as_str());
            tracing::debug!(project = project.name(), path = %ctx.path, reason = %denial, "Navigation denied");
            return Dispatch::Handled(response::status(StatusCode::NOT_FOUND, &extra));
        }

        if !index_used && !ends_with_name(&ctx.path, &name) {
            if ends_with_slash(&ctx.raw_path) {
                index_used = true;
            } else if self.redirects.is_fallback_for_directory(ctx, &info) {
                return self.redirect(ctx, &extra);
            }
        }

        if self.guard.check_access(&info).is_err() {
            return Dispatch::Handled(response::status(self.guard.denial_status(), &extra));
        }

        let canonical_path = if !index_used {
            ctx.path.clone()
        } else if ctx.path.is_empty() {
            name
        } else {
            format!("{}/{}", ctx.path, name)
        };

        match self.handlers.dispatch(&info, &canonical_path, ctx, &extra) {
            Some(response) => Dispatch::Handled(response),
            None => Dispatch::Unhandled,
        }
    }

    fn redirect(&self, ctx: &RequestContext, extra: &HeaderMap) -> Dispatch {
        let location = self.redirects.directory_location(ctx);
        tracing::debug!(path = %ctx.raw_path, location = %location, "Redirecting to directory");
        Dispatch::Handled(response::redirect(&location, extra))
    }
}

impl PathHandler for RequestDispatcher {
    fn name(&self) -> &str {
        "project-files"
    }

    fn process(&self, ctx: &RequestContext, project: &ProjectContext) -> Dispatch {
        self.dispatch(ctx, project)
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("index", &self.index)
            .field("gate", &self.gate)
            .field("guard", &self.guard)
            .field("handlers", &self.handlers)
            .finish()
    }
}
