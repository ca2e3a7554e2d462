//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! signals.rs:   SIGINT / SIGTERM ──▶ Shutdown::trigger
//! shutdown.rs:  Shutdown ──broadcast──▶ HttpServer::run (graceful drain)
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every subscriber sees the same signal
//! - Project reload is file-driven (config::watcher), not signal-driven

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
