//! Access control for resolved resources.
//!
//! # Responsibilities
//! - Refuse raw directory browsing
//! - Keep served files inside their declared source root
//! - Refuse hidden files (dot-prefixed on disk, flagged in the virtual file system)
//!
//! # Design Decisions
//! - Fail closed: a path that cannot be canonicalized is denied
//! - Containment compares canonical paths, so `..` and symlinks cannot escape
//! - Checks read only the `PathInfo` snapshot plus the filesystem, never the cache
//! - Safe mode hides the forbidden/missing distinction behind 404

use std::path::{Component, Path};

use axum::http::StatusCode;
use thiserror::Error;

use crate::observability::metrics;
use crate::project::{PathInfo, Resource, RootLocation};

/// Why a resource may not be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("directory browsing is not allowed")]
    Directory,
    #[error("resource lies outside its source root")]
    OutsideRoot,
    #[error("resource is hidden")]
    Hidden,
    #[error("resource may not be opened by direct navigation")]
    DirectNavigation,
}

impl Denial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Denial::Directory => "directory",
            Denial::OutsideRoot => "outside_root",
            Denial::Hidden => "hidden",
            Denial::DirectNavigation => "direct_navigation",
        }
    }
}

/// Decides whether a resolved resource may be served.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard {
    safe_mode: bool,
}

impl AccessGuard {
    pub fn new(safe_mode: bool) -> Self {
        Self { safe_mode }
    }

    /// Status sent for a denial: 403, or 404 in safe mode.
    pub fn denial_status(&self) -> StatusCode {
        if self.safe_mode {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::FORBIDDEN
        }
    }

    pub fn check_access(&self, info: &PathInfo) -> Result<(), Denial> {
        let result = if let Some(file) = info.local_path() {
            check_local(file, info.root().local_path())
        } else {
            match info.resource() {
                Resource::Virtual(file) => {
                    let contained = match info.root().location() {
                        RootLocation::Virtual(root) => root.is_ancestor_of(file),
                        RootLocation::Local(_) => false,
                    };
                    if file.is_hidden() {
                        Err(Denial::Hidden)
                    } else if !contained {
                        Err(Denial::OutsideRoot)
                    } else {
                        Ok(())
                    }
                }
                // Plain paths always have a local path
                Resource::Local(_) => Err(Denial::OutsideRoot),
            }
        };

        if let Err(denial) = result {
            metrics::record_access_denied(denial.as_str());
            tracing::debug!(path = %info.path(), reason = %denial, "Access denied");
        }
        result
    }
}

fn check_local(file: &Path, root: Option<&Path>) -> Result<(), Denial> {
    if file.is_dir() {
        return Err(Denial::Directory);
    }

    let root = root.ok_or(Denial::OutsideRoot)?;
    let canonical_root = root.canonicalize().map_err(|_| Denial::OutsideRoot)?;
    let canonical_file = file.canonicalize().map_err(|_| Denial::OutsideRoot)?;

    let relative = canonical_file
        .strip_prefix(&canonical_root)
        .map_err(|_| Denial::OutsideRoot)?;

    let hidden = relative.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    });
    if hidden {
        return Err(Denial::Hidden);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{FileAttributes, PathResolver, SourceRoot, VirtualFile};
    use std::fs;
    use std::sync::Arc;

    fn fixture() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        let web = dir.path().join("web");
        fs::create_dir_all(web.join("css")).unwrap();
        fs::create_dir_all(web.join(".git")).unwrap();
        fs::write(web.join("index.html"), "").unwrap();
        fs::write(web.join("css/site.css"), "").unwrap();
        fs::write(web.join(".git/config"), "").unwrap();
        fs::write(web.join(".env"), "").unwrap();
        fs::write(dir.path().join("secret.txt"), "").unwrap();

        let resolver = PathResolver::new(vec![SourceRoot::local("web", &web)]);
        (dir, resolver)
    }

    #[test]
    fn test_file_inside_root_is_allowed() {
        let (_dir, resolver) = fixture();
        let guard = AccessGuard::default();

        assert_eq!(guard.check_access(&resolver.resolve("index.html").unwrap()), Ok(()));
        assert_eq!(guard.check_access(&resolver.resolve("css/site.css").unwrap()), Ok(()));
    }

    #[test]
    fn test_escape_is_denied() {
        let (_dir, resolver) = fixture();
        let guard = AccessGuard::default();

        let escaped = resolver.resolve("../secret.txt").unwrap();
        assert_eq!(guard.check_access(&escaped), Err(Denial::OutsideRoot));

        let escaped = resolver.resolve("css/../../secret.txt").unwrap();
        assert_eq!(guard.check_access(&escaped), Err(Denial::OutsideRoot));
    }

    #[test]
    fn test_directory_is_denied() {
        let (_dir, resolver) = fixture();
        let guard = AccessGuard::default();

        assert_eq!(guard.check_access(&resolver.resolve("css").unwrap()), Err(Denial::Directory));
        assert_eq!(guard.check_access(&resolver.resolve("").unwrap()), Err(Denial::Directory));
    }

    #[test]
    fn test_dot_files_are_denied() {
        let (_dir, resolver) = fixture();
        let guard = AccessGuard::default();

        assert_eq!(guard.check_access(&resolver.resolve(".env").unwrap()), Err(Denial::Hidden));
        assert_eq!(
            guard.check_access(&resolver.resolve(".git/config").unwrap()),
            Err(Denial::Hidden)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_root_is_denied() {
        let (dir, resolver) = fixture();
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), dir.path().join("web/link.txt"))
            .unwrap();

        let linked = resolver.resolve("link.txt").unwrap();
        assert_eq!(AccessGuard::default().check_access(&linked), Err(Denial::OutsideRoot));
    }

    #[test]
    fn test_virtual_files() {
        let tree = VirtualFile::root("site");
        tree.create_file("app.js", "").unwrap();
        tree.create_file_with("private.js", "", FileAttributes::hidden()).unwrap();
        let resolver = PathResolver::new(vec![SourceRoot::virtual_dir("gen", tree)]);
        let guard = AccessGuard::default();

        assert_eq!(guard.check_access(&resolver.resolve("app.js").unwrap()), Ok(()));
        assert_eq!(
            guard.check_access(&resolver.resolve("private.js").unwrap()),
            Err(Denial::Hidden)
        );
    }

    #[test]
    fn test_virtual_file_outside_root_is_denied() {
        let tree = VirtualFile::root("site");
        let public = tree.create_directory("public").unwrap();
        tree.create_file("internal.js", "").unwrap();
        let resolver = PathResolver::new(vec![SourceRoot::virtual_dir("gen", public)]);

        let escaped = resolver.resolve("../internal.js").unwrap();
        assert_eq!(AccessGuard::default().check_access(&escaped), Err(Denial::OutsideRoot));
    }

    #[test]
    fn test_local_backed_virtual_directory_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let tree = VirtualFile::root_with("mounted", FileAttributes::local(dir.path()));
        let root = Arc::new(SourceRoot::virtual_dir("mounted", tree.clone()));
        let info = PathInfo::new(Resource::Virtual(tree), root);

        assert_eq!(AccessGuard::default().check_access(&info), Err(Denial::Directory));
    }

    #[test]
    fn test_denial_status() {
        assert_eq!(AccessGuard::new(false).denial_status(), StatusCode::FORBIDDEN);
        assert_eq!(AccessGuard::new(true).denial_status(), StatusCode::NOT_FOUND);
    }
}
