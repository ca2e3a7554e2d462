//! Relative path lookup across a project's source roots.
//!
//! # Responsibilities
//! - Join a relative request path onto each source root in declared order
//! - Return the first existing match as a `PathInfo`
//!
//! # Design Decisions
//! - Segments are pushed one by one, so no segment can replace the root
//!   with an absolute path
//! - `..` segments are kept as-is; containment is enforced by the access guard
//!   on the canonical path, not here
//! - Missing paths yield `None`, never an error

use std::sync::Arc;

use crate::project::path_info::{PathInfo, Resource};
use crate::project::root::{RootLocation, SourceRoot};

/// Resolves relative paths against an ordered list of roots.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    roots: Vec<Arc<SourceRoot>>,
}

impl PathResolver {
    pub fn new(roots: Vec<SourceRoot>) -> Self {
        Self {
            roots: roots.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn roots(&self) -> &[Arc<SourceRoot>] {
        &self.roots
    }

    /// Resolve `relative_path`; the first root containing it wins.
    pub fn resolve(&self, relative_path: &str) -> Option<PathInfo> {
        let segments: Vec<&str> = relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        self.roots
            .iter()
            .find_map(|root| resolve_in_root(root, &segments))
    }
}

fn resolve_in_root(root: &Arc<SourceRoot>, segments: &[&str]) -> Option<PathInfo> {
    let resource = match root.location() {
        RootLocation::Local(base) => {
            let mut path = base.clone();
            for segment in segments {
                path.push(segment);
            }
            path.exists().then_some(Resource::Local(path))?
        }
        RootLocation::Virtual(directory) => {
            Resource::Virtual(directory.find_by_segments(segments.iter().copied())?)
        }
    };

    Some(PathInfo::new(resource, Arc::clone(root)))
}
