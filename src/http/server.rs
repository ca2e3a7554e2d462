//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Match requests to projects and run the path handler chain
//! - Swap the project registry when configuration is reloaded
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::WebServerConfig;
use crate::handlers::{ContentHandler, HandlerChain, StaticFileHandler};
use crate::http::dispatcher::RequestDispatcher;
use crate::http::request::{MakeRequestUuid, RequestContext, X_REQUEST_ID};
use crate::http::response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::project::ProjectRegistry;
use crate::routing::{match_project, PathHandler, PathRouter};
use crate::security::{
    ConfiguredTokenValidator, NavigationClassifier, TokenValidator, UserAgentClassifier,
};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<ArcSwap<ProjectRegistry>>,
    pub router: Arc<PathRouter>,
    pub classifier: Arc<dyn NavigationClassifier>,
}

/// Built-in web server serving project files.
pub struct HttpServer {
    router: Router,
    config: WebServerConfig,
    projects: Arc<ArcSwap<ProjectRegistry>>,
}

/// Collects the pluggable parts of an [`HttpServer`].
pub struct HttpServerBuilder {
    config: WebServerConfig,
    content_handlers: Vec<Arc<dyn ContentHandler>>,
    path_handlers: Vec<Arc<dyn PathHandler>>,
    classifier: Arc<dyn NavigationClassifier>,
    tokens: Option<Arc<dyn TokenValidator>>,
}

impl HttpServerBuilder {
    /// Register a content handler. Handlers run in registration order; the
    /// static file handler always runs last.
    pub fn content_handler(mut self, handler: Arc<dyn ContentHandler>) -> Self {
        self.content_handlers.push(handler);
        self
    }

    /// Register a top-level path handler, tried after project files.
    pub fn path_handler(mut self, handler: Arc<dyn PathHandler>) -> Self {
        self.path_handlers.push(handler);
        self
    }

    pub fn navigation_classifier(mut self, classifier: Arc<dyn NavigationClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn token_validator(mut self, tokens: Arc<dyn TokenValidator>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn build(self) -> HttpServer {
        let mut content_handlers = self.content_handlers;
        content_handlers.push(Arc::new(StaticFileHandler));

        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(ConfiguredTokenValidator::new(&self.config.auth)));
        let dispatcher =
            RequestDispatcher::new(&self.config, tokens, HandlerChain::new(content_handlers));

        let mut path_handlers: Vec<Arc<dyn PathHandler>> = vec![Arc::new(dispatcher)];
        path_handlers.extend(self.path_handlers);
        let path_router = Arc::new(PathRouter::new(path_handlers));

        let projects = Arc::new(ArcSwap::from_pointee(ProjectRegistry::from_config(
            &self.config.projects,
            self.config.serve.cache_capacity,
        )));

        let state = AppState {
            projects: Arc::clone(&projects),
            router: path_router,
            classifier: self.classifier,
        };

        let router = HttpServer::build_router(&self.config, state);
        HttpServer {
            router,
            config: self.config,
            projects,
        }
    }
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: WebServerConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: WebServerConfig) -> HttpServerBuilder {
        HttpServerBuilder {
            config,
            content_handlers: Vec::new(),
            path_handlers: Vec::new(),
            classifier: Arc::new(UserAgentClassifier),
            tokens: None,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &WebServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(serve_request))
            .route("/{*path}", any(serve_request))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The Axum router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Currently served projects.
    pub fn projects(&self) -> Arc<ArcSwap<ProjectRegistry>> {
        Arc::clone(&self.projects)
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &WebServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the served projects;
    /// serving policy changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<WebServerConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            projects = self.projects.load().len(),
            "HTTP server starting"
        );

        let projects = Arc::clone(&self.projects);
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let registry =
                    ProjectRegistry::from_config(&config.projects, config.serve.cache_capacity);
                tracing::info!(projects = registry.len(), "Project registry reloaded");
                projects.store(Arc::new(registry));
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown::wait(shutdown).await;
                tracing::info!("Graceful shutdown initiated");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: match the project, then run the path handler chain.
async fn serve_request(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();

    let raw_path = percent_decode_str(parts.uri.path())
        .decode_utf8_lossy()
        .into_owned();
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| parts.uri.authority().map(|authority| authority.to_string()));

    let registry = state.projects.load_full();
    let Some(matched) = match_project(&registry, host.as_deref(), &raw_path) else {
        tracing::debug!(path = %raw_path, "No project matched");
        metrics::record_request(404, start_time);
        return response::not_found();
    };

    let ctx = RequestContext {
        method: parts.method,
        raw_path,
        path: matched.path,
        project_name: matched.project.name().to_string(),
        is_custom_host: matched.is_custom_host,
        host,
        query: parts.uri.query().map(str::to_string),
        is_browser_navigation: state.classifier.is_browser_navigation(&parts.headers),
        headers: parts.headers,
    };

    let router = Arc::clone(&state.router);
    let project = matched.project;
    let response = match tokio::task::spawn_blocking(move || router.route(&ctx, &project)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Request dispatch task failed");
            response::status(StatusCode::INTERNAL_SERVER_ERROR, &Default::default())
        }
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}
