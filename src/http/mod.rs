//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, project match)
//!     → request.rs (RequestContext: decoded paths, headers, navigation flag)
//!     → [routing: top-level path handlers]
//!     → dispatcher.rs (token, resolve, index, redirects, access, handlers)
//!     → response.rs (status, redirect, extra headers)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::RequestDispatcher;
pub use request::{RequestContext, X_REQUEST_ID};
pub use server::{HttpServer, HttpServerBuilder};
