//! Per-project cache of resolved request paths.
//!
//! # Responsibilities
//! - Memoize `relative path -> PathInfo` for one project session
//! - Treat entries whose resource disappeared as absent
//! - Bound the number of entries
//!
//! # Design Decisions
//! - Lookup is two-step: fetch, then check `PathInfo::is_valid`; a stale entry
//!   is evicted and the caller re-resolves
//! - A fresher resolution overwrites the previous entry, never merges
//! - DashMap gives concurrent read/insert without a cache-wide lock
//! - Eviction order is unspecified; correctness never depends on it

use dashmap::DashMap;

use crate::observability::metrics;
use crate::project::path_info::PathInfo;

/// Default number of entries kept per project.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Thread-safe cache of resolved paths.
#[derive(Debug)]
pub struct PathCache {
    entries: DashMap<String, PathInfo>,
    capacity: usize,
}

impl PathCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Return the cached entry for `path` if its resource is still valid.
    pub fn lookup(&self, path: &str) -> Option<PathInfo> {
        // Clone out so the shard lock is not held across filesystem checks
        let cached = self.entries.get(path).map(|entry| entry.value().clone());

        match cached {
            Some(info) if info.is_valid() => {
                metrics::record_path_cache("hit");
                Some(info)
            }
            Some(_) => {
                self.entries.remove_if(path, |_, info| !info.is_valid());
                metrics::record_path_cache("stale");
                tracing::debug!(path = %path, "Evicted stale path cache entry");
                None
            }
            None => {
                metrics::record_path_cache("miss");
                None
            }
        }
    }

    /// Insert or replace the entry for `path`, then evict other entries until
    /// the cache is back within capacity.
    pub fn store(&self, path: &str, info: PathInfo) {
        self.entries.insert(path.to_string(), info);

        while self.entries.len() > self.capacity {
            let victim = self
                .entries
                .iter()
                .map(|entry| entry.key().clone())
                .find(|key| key != path);
            match victim {
                Some(victim) => {
                    self.entries.remove(&victim);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::path_info::Resource;
    use crate::project::root::SourceRoot;
    use crate::project::vfs::VirtualFile;
    use std::sync::Arc;

    fn virtual_info(tree: &VirtualFile, path: &str) -> PathInfo {
        let file = tree.find_by_relative_path(path).unwrap();
        let root = Arc::new(SourceRoot::virtual_dir("main", tree.clone()));
        PathInfo::new(Resource::Virtual(file), root)
    }

    #[test]
    fn test_lookup_returns_stored_entry() {
        let tree = VirtualFile::root("site");
        tree.create_file("app.js", "").unwrap();
        let cache = PathCache::default();

        assert!(cache.lookup("app.js").is_none());

        cache.store("app.js", virtual_info(&tree, "app.js"));
        let hit = cache.lookup("app.js").unwrap();
        assert_eq!(hit.name(), "app.js");
    }

    #[test]
    fn test_stale_entry_is_a_miss_and_evicted() {
        let tree = VirtualFile::root("site");
        let file = tree.create_file("app.js", "").unwrap();
        let cache = PathCache::default();
        cache.store("app.js", virtual_info(&tree, "app.js"));

        file.delete();

        assert!(cache.lookup("app.js").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_store_overwrites() {
        let tree = VirtualFile::root("site");
        tree.create_file("a.html", "").unwrap();
        tree.create_file("b.html", "").unwrap();
        let cache = PathCache::default();

        cache.store("page", virtual_info(&tree, "a.html"));
        cache.store("page", virtual_info(&tree, "b.html"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("page").unwrap().name(), "b.html");
    }

    #[test]
    fn test_capacity_is_bounded() {
        let tree = VirtualFile::root("site");
        for i in 0..5 {
            tree.create_file(&format!("{i}.txt"), "").unwrap();
        }
        let cache = PathCache::new(3);

        for i in 0..5 {
            let path = format!("{i}.txt");
            cache.store(&path, virtual_info(&tree, &path));
        }

        assert_eq!(cache.len(), 3);
        // The most recent insertion is always present
        assert!(cache.lookup("4.txt").is_some());
    }

    #[test]
    fn test_capacity_holds_under_concurrent_stores() {
        let tree = VirtualFile::root("site");
        for i in 0..64 {
            tree.create_file(&format!("{i}.txt"), "").unwrap();
        }
        let cache = Arc::new(PathCache::new(16));

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                let tree = tree.clone();
                std::thread::spawn(move || {
                    for round in 0..500 {
                        let path = format!("{}.txt", (worker * 7 + round) % 64);
                        if cache.lookup(&path).is_none() {
                            cache.store(&path, virtual_info(&tree, &path));
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert!(cache.len() <= 16, "cache grew to {}", cache.len());
    }
}
