//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::project::cache::DEFAULT_CACHE_CAPACITY;
use crate::project::index::DEFAULT_INDEX_FILES;

/// Root configuration for the built-in web server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Path resolution and dispatch policy.
    pub serve: ServeConfig,

    /// Access token verification.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Projects served by this instance.
    pub projects: Vec<ProjectConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:63342").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:63342".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Path resolution, access and dispatch policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Answer 404 instead of 403 so forbidden and missing resources look alike.
    pub safe_mode: bool,

    /// Ordered candidate names for directory index resources.
    pub index_files: Vec<String>,

    /// Extensions that plain browser navigations may open directly.
    pub directly_accessible: Vec<String>,

    /// Maximum number of cached path resolutions per project.
    pub cache_capacity: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            safe_mode: false,
            index_files: DEFAULT_INDEX_FILES.iter().map(|name| name.to_string()).collect(),
            directly_accessible: ["html", "htm", "shtml", "stm", "shtm"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Access token verification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Serve requests that present no token at all.
    pub allow_unsigned: bool,

    /// Accepted tokens.
    pub tokens: Vec<String>,

    /// Request header carrying a token.
    pub token_header: String,

    /// Query parameter carrying a token; a valid one is turned into a cookie.
    pub token_param: String,

    /// Cookie carrying a previously accepted token.
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_unsigned: true,
            tokens: Vec::new(),
            token_header: "x-server-token".to_string(),
            token_param: "_token".to_string(),
            cookie_name: "server-token".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A served project.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project name: first URL path segment, or the host name on custom hosts.
    pub name: String,

    /// Modules, in root search order.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// A module and its source roots.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleConfig {
    /// Module identifier for logging.
    pub name: String,

    /// Roots belong to a library rather than project sources.
    #[serde(default)]
    pub library: bool,

    /// Source root directories, searched in order.
    pub roots: Vec<PathBuf>,
}
