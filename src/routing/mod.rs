//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, decoded path)
//!     → matcher.rs (pick project, strip prefix, resolve dot segments)
//!     → router.rs (offer to top-level path handlers in order)
//!     → Return: first handled response, or 404
//!
//! Inside the dispatcher:
//!     → redirect.rs (trailing-slash and fallback-resource redirects)
//! ```
//!
//! # Design Decisions
//! - Handlers registered at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same project
//! - First handler wins (registration order)

pub mod matcher;
pub mod redirect;
pub mod router;

pub use matcher::{match_project, ProjectMatch};
pub use redirect::RedirectPolicy;
pub use router::{Dispatch, PathHandler, PathRouter};
