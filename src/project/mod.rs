//! Project resources subsystem.
//!
//! # Data Flow
//! ```text
//! Relative request path
//!     → cache.rs (lookup, validity check)
//!     → resolver.rs (on miss: scan source roots in declared order)
//!     → path_info.rs (immutable PathInfo: local path or virtual handle)
//!     → index.rs (directories: substitute the index resource)
//! ```
//!
//! # Design Decisions
//! - One `ProjectContext` per served project; caches are never shared
//! - `PathInfo` is a snapshot; checks never re-read mutable state mid-way
//! - Local paths and virtual handles are one tagged variant, never both

pub mod cache;
pub mod index;
pub mod path_info;
pub mod registry;
pub mod resolver;
pub mod root;
pub mod vfs;

pub use cache::PathCache;
pub use index::IndexResolver;
pub use path_info::{PathInfo, Resource};
pub use registry::{ProjectContext, ProjectRegistry};
pub use resolver::PathResolver;
pub use root::{RootLocation, SourceRoot};
pub use vfs::{FileAttributes, VfsError, VirtualFile};
