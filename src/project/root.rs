//! Source roots: the directory boundaries a project serves files from.

use std::path::{Path, PathBuf};

use crate::project::vfs::VirtualFile;

/// Where a source root lives.
#[derive(Debug, Clone)]
pub enum RootLocation {
    /// A directory on the local filesystem.
    Local(PathBuf),
    /// A directory of the virtual file system.
    Virtual(VirtualFile),
}

/// A directory boundary owned by a module.
#[derive(Debug, Clone)]
pub struct SourceRoot {
    location: RootLocation,
    module_name: String,
    is_library: bool,
}

impl SourceRoot {
    pub fn local(module_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            location: RootLocation::Local(path.into()),
            module_name: module_name.into(),
            is_library: false,
        }
    }

    pub fn virtual_dir(module_name: impl Into<String>, directory: VirtualFile) -> Self {
        Self {
            location: RootLocation::Virtual(directory),
            module_name: module_name.into(),
            is_library: false,
        }
    }

    /// Mark this root as belonging to a library rather than project sources.
    pub fn library(mut self) -> Self {
        self.is_library = true;
        self
    }

    pub fn location(&self) -> &RootLocation {
        &self.location
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn is_library(&self) -> bool {
        self.is_library
    }

    /// Filesystem location of the root, if it has one.
    pub fn local_path(&self) -> Option<&Path> {
        match &self.location {
            RootLocation::Local(path) => Some(path),
            RootLocation::Virtual(directory) => directory.local_path(),
        }
    }
}
