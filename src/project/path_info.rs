//! Resolved identity of a request path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::project::root::SourceRoot;
use crate::project::vfs::VirtualFile;

/// The concrete resource behind a request path.
#[derive(Debug, Clone)]
pub enum Resource {
    Virtual(VirtualFile),
    Local(PathBuf),
}

/// Immutable result of resolving a relative request path.
///
/// Substituting a directory by its index builds a new value through
/// [`PathInfo::with_resource`]; nothing is mutated after construction.
#[derive(Debug, Clone)]
pub struct PathInfo {
    resource: Resource,
    root: Arc<SourceRoot>,
}

impl PathInfo {
    pub fn new(resource: Resource, root: Arc<SourceRoot>) -> Self {
        Self { resource, root }
    }

    /// Same root and module, different resource.
    pub fn with_resource(&self, resource: Resource) -> Self {
        Self {
            resource,
            root: Arc::clone(&self.root),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn root(&self) -> &SourceRoot {
        &self.root
    }

    pub fn module_name(&self) -> &str {
        self.root.module_name()
    }

    pub fn is_library(&self) -> bool {
        self.root.is_library()
    }

    pub fn is_directory(&self) -> bool {
        match &self.resource {
            Resource::Virtual(file) => file.is_directory(),
            Resource::Local(path) => path.is_dir(),
        }
    }

    /// Leaf name of the resource.
    pub fn name(&self) -> String {
        match &self.resource {
            Resource::Virtual(file) => file.name().to_string(),
            Resource::Local(path) => file_name(path),
        }
    }

    /// Full path of the resource, slash separated.
    pub fn path(&self) -> String {
        match &self.resource {
            Resource::Virtual(file) => file.path(),
            Resource::Local(path) => path.to_string_lossy().replace('\\', "/"),
        }
    }

    /// Name of the directory containing the resource.
    pub fn parent_name(&self) -> Option<String> {
        match &self.resource {
            Resource::Virtual(file) => file.parent().map(|parent| parent.name().to_string()),
            Resource::Local(path) => path.parent().map(file_name).filter(|name| !name.is_empty()),
        }
    }

    /// Filesystem location of the resource, for plain paths and local-backed handles.
    pub fn local_path(&self) -> Option<&Path> {
        match &self.resource {
            Resource::Virtual(file) => file.local_path(),
            Resource::Local(path) => Some(path),
        }
    }

    /// False once the underlying resource was deleted.
    pub fn is_valid(&self) -> bool {
        match &self.resource {
            Resource::Virtual(file) => file.is_valid(),
            Resource::Local(path) => path.exists(),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_info() {
        let dir = tempfile::tempdir().unwrap();
        let login = dir.path().join("login");
        std::fs::create_dir(&login).unwrap();
        let index = login.join("index.php");
        std::fs::write(&index, "<?php").unwrap();

        let root = Arc::new(SourceRoot::local("web", dir.path()).library());
        let info = PathInfo::new(Resource::Local(index.clone()), root);

        assert_eq!(info.name(), "index.php");
        assert_eq!(info.parent_name().as_deref(), Some("login"));
        assert_eq!(info.module_name(), "web");
        assert!(info.is_library());
        assert!(!info.is_directory());
        assert!(info.is_valid());

        std::fs::remove_file(&index).unwrap();
        assert!(!info.is_valid());
    }

    #[test]
    fn test_with_resource_keeps_root() {
        let tree = VirtualFile::root("site");
        let docs = tree.create_directory("docs").unwrap();
        let index = docs.create_file("index.html", "").unwrap();

        let root = Arc::new(SourceRoot::virtual_dir("docs-module", tree));
        let directory = PathInfo::new(Resource::Virtual(docs), root);
        let substituted = directory.with_resource(Resource::Virtual(index));

        assert!(directory.is_directory());
        assert!(!substituted.is_directory());
        assert_eq!(substituted.name(), "index.html");
        assert_eq!(substituted.path(), "/site/docs/index.html");
        assert_eq!(substituted.parent_name().as_deref(), Some("docs"));
        assert_eq!(substituted.module_name(), "docs-module");
        assert!(substituted.local_path().is_none());
    }
}
