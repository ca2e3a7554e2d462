//! Index resource lookup for directory requests.

use crate::project::path_info::{PathInfo, Resource};

/// Index file names tried when none are configured.
pub const DEFAULT_INDEX_FILES: &[&str] = &["index.html", "index.htm", "default.html", "default.htm"];

/// Finds the default document inside a directory.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    names: Vec<String>,
}

impl IndexResolver {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// First candidate present directly inside `directory`, as a new `PathInfo`.
    pub fn find_index(&self, directory: &PathInfo) -> Option<PathInfo> {
        let resource = match directory.resource() {
            Resource::Virtual(dir) => self
                .names
                .iter()
                .filter_map(|name| dir.child(name))
                .find(|child| !child.is_directory())
                .map(Resource::Virtual),
            Resource::Local(dir) => self
                .names
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
                .map(Resource::Local),
        }?;

        Some(directory.with_resource(resource))
    }
}

impl Default for IndexResolver {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_FILES.iter().map(|name| name.to_string()).collect())
    }
}
