//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Routed request:
//!     → token.rs (verify access token, produce extra response headers)
//!     → [resolution, index substitution]
//!     → navigation.rs (disclosure gate for plain browser navigations)
//!     → access_control.rs (directory, containment, hidden checks)
//!     → Pass to content handlers
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod access_control;
pub mod navigation;
pub mod token;

pub use access_control::{AccessGuard, Denial};
pub use navigation::{DisclosureGate, NavigationClassifier, UserAgentClassifier};
pub use token::{ConfiguredTokenValidator, TokenError, TokenValidator};
