//! Built-in web server for project files.

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod project;
pub mod routing;
pub mod security;

pub use config::schema::WebServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
