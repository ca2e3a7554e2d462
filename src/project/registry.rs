//! Served projects and their per-session state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProjectConfig;
use crate::project::cache::PathCache;
use crate::project::path_info::PathInfo;
use crate::project::resolver::PathResolver;
use crate::project::root::SourceRoot;

/// One served project: its roots and its own path cache.
///
/// Each project owns its cache, so concurrently served projects never
/// observe each other's resolutions.
#[derive(Debug)]
pub struct ProjectContext {
    name: String,
    resolver: PathResolver,
    cache: PathCache,
}

impl ProjectContext {
    pub fn new(name: impl Into<String>, roots: Vec<SourceRoot>, cache_capacity: usize) -> Self {
        Self {
            name: name.into(),
            resolver: PathResolver::new(roots),
            cache: PathCache::new(cache_capacity),
        }
    }

    pub fn from_config(config: &ProjectConfig, cache_capacity: usize) -> Self {
        let roots = config
            .modules
            .iter()
            .flat_map(|module| {
                module.roots.iter().map(move |path| {
                    let root = SourceRoot::local(module.name.clone(), path.clone());
                    if module.library { root.library() } else { root }
                })
            })
            .collect();

        Self::new(config.name.clone(), roots, cache_capacity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Resolve `path` against the project's roots, bypassing the cache.
    pub fn find_by_relative_path(&self, path: &str) -> Option<PathInfo> {
        self.resolver.resolve(path)
    }

    /// Cached resolution: a valid cache hit, else a fresh resolution which
    /// replaces the cache entry.
    pub fn resolve(&self, path: &str) -> Option<PathInfo> {
        if let Some(info) = self.cache.lookup(path) {
            return Some(info);
        }

        let info = self.resolver.resolve(path)?;
        self.cache.store(path, info.clone());
        Some(info)
    }
}

/// Immutable name -> project map, swapped wholesale on reload.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: HashMap<String, Arc<ProjectContext>>,
}

impl ProjectRegistry {
    pub fn new(projects: Vec<ProjectContext>) -> Self {
        Self {
            projects: projects
                .into_iter()
                .map(|project| (project.name.clone(), Arc::new(project)))
                .collect(),
        }
    }

    pub fn from_config(projects: &[ProjectConfig], cache_capacity: usize) -> Self {
        Self::new(
            projects
                .iter()
                .map(|project| ProjectContext::from_config(project, cache_capacity))
                .collect(),
        )
    }

    /// Project whose name is the first path segment (case-sensitive).
    pub fn get(&self, name: &str) -> Option<Arc<ProjectContext>> {
        self.projects.get(name).cloned()
    }

    /// Project served on its own host name (case-insensitive).
    pub fn get_by_host(&self, host: &str) -> Option<Arc<ProjectContext>> {
        self.projects
            .values()
            .find(|project| project.name.eq_ignore_ascii_case(host))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
