//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, resolve relative roots)
//!     → validation.rs (semantic checks)
//!     → WebServerConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server rebuilds the project registry and swaps it atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Reload replaces projects (and therefore their path caches) only;
//!   listener and dispatch policy need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AuthConfig, ListenerConfig, ModuleConfig, ObservabilityConfig, ProjectConfig, ServeConfig,
    TimeoutConfig, WebServerConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
