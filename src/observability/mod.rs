//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request path (server, dispatcher, cache, access checks, handlers):
//!     → logging.rs (tracing events with project/path fields)
//!     → metrics.rs (request outcomes, cache hit rate, denials, handler failures)
//!
//! Exposed as:
//!     → stdout (fmt subscriber, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint, when enabled
//! ```
//!
//! # Design Decisions
//! - Denials log at debug: a 404 for a hidden file is routine, not an incident
//! - Handler failures log at error and never reach the client
//! - Request IDs come from the tower-http layers, not from this module

pub mod logging;
pub mod metrics;
