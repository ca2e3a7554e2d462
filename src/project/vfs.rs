//! In-memory virtual file system.
//!
//! # Responsibilities
//! - Model file handles that are not plain filesystem paths (generated
//!   content, archive entries, mounted snapshots)
//! - Track handle validity so cached resolutions can detect deletion
//! - Expose the properties access control needs (hidden flag, backing local path)
//!
//! # Design Decisions
//! - Handles are cheap `Arc` clones; equality is identity
//! - Children hold a weak link to their parent, so dropping a root frees the tree
//! - Deleting a node invalidates the whole subtree

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use thiserror::Error;

/// Error type for virtual file system mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("`{0}` is not a directory")]
    NotADirectory(String),
    #[error("`{0}` already exists")]
    AlreadyExists(String),
    #[error("`{0}` is not a valid file name")]
    InvalidName(String),
    #[error("`{0}` has been deleted")]
    Invalidated(String),
}

/// Optional properties of a virtual file.
#[derive(Debug, Clone, Default)]
pub struct FileAttributes {
    /// Hidden files are never served.
    pub hidden: bool,
    /// Location on the local filesystem backing this handle, if any.
    pub local_path: Option<PathBuf>,
}

impl FileAttributes {
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            local_path: None,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            hidden: false,
            local_path: Some(path.into()),
        }
    }
}

enum NodeKind {
    Directory(RwLock<BTreeMap<String, Arc<Node>>>),
    File(Arc<[u8]>),
}

struct Node {
    name: String,
    parent: Option<Weak<Node>>,
    kind: NodeKind,
    attributes: FileAttributes,
    valid: AtomicBool,
}

/// A handle to a file or directory of the virtual file system.
#[derive(Clone)]
pub struct VirtualFile(Arc<Node>);

impl VirtualFile {
    /// Create a new root directory.
    pub fn root(name: impl Into<String>) -> Self {
        Self::root_with(name, FileAttributes::default())
    }

    /// Create a new root directory with attributes (e.g. a local backing path).
    pub fn root_with(name: impl Into<String>, attributes: FileAttributes) -> Self {
        Self(Arc::new(Node {
            name: name.into(),
            parent: None,
            kind: NodeKind::Directory(RwLock::new(BTreeMap::new())),
            attributes,
            valid: AtomicBool::new(true),
        }))
    }

    pub fn create_directory(&self, name: &str) -> Result<VirtualFile, VfsError> {
        self.create_directory_with(name, FileAttributes::default())
    }

    pub fn create_directory_with(
        &self,
        name: &str,
        attributes: FileAttributes,
    ) -> Result<VirtualFile, VfsError> {
        self.insert_child(name, NodeKind::Directory(RwLock::new(BTreeMap::new())), attributes)
    }

    pub fn create_file(&self, name: &str, content: impl Into<Vec<u8>>) -> Result<VirtualFile, VfsError> {
        self.create_file_with(name, content, FileAttributes::default())
    }

    pub fn create_file_with(
        &self,
        name: &str,
        content: impl Into<Vec<u8>>,
        attributes: FileAttributes,
    ) -> Result<VirtualFile, VfsError> {
        let content: Arc<[u8]> = Arc::from(content.into());
        self.insert_child(name, NodeKind::File(content), attributes)
    }

    fn insert_child(
        &self,
        name: &str,
        kind: NodeKind,
        attributes: FileAttributes,
    ) -> Result<VirtualFile, VfsError> {
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(VfsError::InvalidName(name.to_string()));
        }
        if !self.is_valid() {
            return Err(VfsError::Invalidated(self.path()));
        }
        let NodeKind::Directory(children) = &self.0.kind else {
            return Err(VfsError::NotADirectory(self.path()));
        };

        let mut children = children.write().expect("vfs directory lock poisoned");
        if children.contains_key(name) {
            return Err(VfsError::AlreadyExists(format!("{}/{}", self.path(), name)));
        }

        let node = Arc::new(Node {
            name: name.to_string(),
            parent: Some(Arc::downgrade(&self.0)),
            kind,
            attributes,
            valid: AtomicBool::new(true),
        });
        children.insert(name.to_string(), Arc::clone(&node));
        Ok(Self(node))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Slash separated path from the root of the tree, e.g. `/site/css/main.css`.
    pub fn path(&self) -> String {
        let mut names = vec![self.0.name.clone()];
        let mut current = self.parent();
        while let Some(parent) = current {
            names.push(parent.0.name.clone());
            current = parent.parent();
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    pub fn parent(&self) -> Option<VirtualFile> {
        self.0.parent.as_ref().and_then(Weak::upgrade).map(Self)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.0.kind, NodeKind::Directory(_))
    }

    pub fn is_hidden(&self) -> bool {
        self.0.attributes.hidden
    }

    /// A handle stays valid until it, or one of its ancestors, is deleted.
    pub fn is_valid(&self) -> bool {
        self.0.valid.load(Ordering::Acquire)
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.0.attributes.local_path.as_deref()
    }

    /// File content, `None` for directories.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.0.kind {
            NodeKind::File(content) => Some(content.as_ref()),
            NodeKind::Directory(_) => None,
        }
    }

    /// Direct child by name.
    pub fn child(&self, name: &str) -> Option<VirtualFile> {
        let NodeKind::Directory(children) = &self.0.kind else {
            return None;
        };
        let children = children.read().expect("vfs directory lock poisoned");
        children
            .get(name)
            .filter(|node| node.valid.load(Ordering::Acquire))
            .map(|node| Self(Arc::clone(node)))
    }

    pub fn children(&self) -> Vec<VirtualFile> {
        let NodeKind::Directory(children) = &self.0.kind else {
            return Vec::new();
        };
        let children = children.read().expect("vfs directory lock poisoned");
        children.values().map(|node| Self(Arc::clone(node))).collect()
    }

    /// Walk `segments` from this handle. `.` stays in place, `..` moves to the parent.
    pub fn find_by_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Option<VirtualFile> {
        let mut current = self.clone();
        for segment in segments {
            current = match segment {
                "" | "." => current,
                ".." => current.parent()?,
                name => current.child(name)?,
            };
        }
        current.is_valid().then_some(current)
    }

    pub fn find_by_relative_path(&self, relative_path: &str) -> Option<VirtualFile> {
        self.find_by_segments(relative_path.split('/'))
    }

    /// True if `self` is `other` or one of its ancestors.
    pub fn is_ancestor_of(&self, other: &VirtualFile) -> bool {
        let mut current = Some(other.clone());
        while let Some(file) = current {
            if file == *self {
                return true;
            }
            current = file.parent();
        }
        false
    }

    /// Delete this handle and its subtree. Outstanding handles become invalid.
    pub fn delete(&self) {
        if let Some(parent) = self.parent() {
            if let NodeKind::Directory(children) = &parent.0.kind {
                children
                    .write()
                    .expect("vfs directory lock poisoned")
                    .remove(&self.0.name);
            }
        }
        self.invalidate();
    }

    fn invalidate(&self) {
        self.0.valid.store(false, Ordering::Release);
        for child in self.children() {
            child.invalidate();
        }
    }
}

impl PartialEq for VirtualFile {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for VirtualFile {}

impl fmt::Debug for VirtualFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualFile")
            .field("path", &self.path())
            .field("directory", &self.is_directory())
            .field("valid", &self.is_valid())
            .finish()
    }
}
