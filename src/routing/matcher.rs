//! Project matching.
//!
//! # Responsibilities
//! - Pick the project a request addresses (Host header or first path segment)
//! - Strip the project prefix and resolve `.`/`..` segments
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec)
//! - Project names in paths are case-sensitive
//! - A `..` climbing above the server root matches nothing
//! - Loopback hosts always use path-prefix matching

use std::sync::Arc;

use crate::project::{ProjectContext, ProjectRegistry};

/// Outcome of matching a request to a project.
#[derive(Debug, Clone)]
pub struct ProjectMatch {
    pub project: Arc<ProjectContext>,
    /// Project-relative path, no leading or trailing slash.
    pub path: String,
    /// The project was selected by the Host header.
    pub is_custom_host: bool,
}

/// Host without its port, brackets stripped from IPv6 literals.
pub fn host_name(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.rsplit_once(':').map(|(name, _)| name).unwrap_or(host)
}

pub fn is_loopback_host(host: &str) -> bool {
    let name = host_name(host);
    name.eq_ignore_ascii_case("localhost")
        || name == "::1"
        || name
            .parse::<std::net::Ipv4Addr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}

/// Resolve `.` and `..` segments of a decoded request path.
///
/// Returns the non-empty segments, or `None` if the path climbs above `/`.
pub fn normalize_segments(path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            segment => segments.push(segment),
        }
    }
    Some(segments)
}

/// Match a decoded request path (and optional Host header) to a project.
pub fn match_project(
    registry: &ProjectRegistry,
    host: Option<&str>,
    decoded_path: &str,
) -> Option<ProjectMatch> {
    let segments = normalize_segments(decoded_path)?;

    if let Some(host) = host.filter(|host| !is_loopback_host(host)) {
        if let Some(project) = registry.get_by_host(host_name(host)) {
            return Some(ProjectMatch {
                project,
                path: segments.join("/"),
                is_custom_host: true,
            });
        }
    }

    let (first, rest) = segments.split_first()?;
    let project = registry.get(first)?;
    Some(ProjectMatch {
        project,
        path: rest.join("/"),
        is_custom_host: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProjectRegistry {
        ProjectRegistry::new(vec![
            ProjectContext::new("shop", Vec::new(), 10),
            ProjectContext::new("docs.example", Vec::new(), 10),
        ])
    }

    #[test]
    fn test_host_name() {
        assert_eq!(host_name("localhost:63342"), "localhost");
        assert_eq!(host_name("[::1]:8080"), "::1");
        assert_eq!(host_name("example.com"), "example.com");
    }

    #[test]
    fn test_loopback_hosts() {
        assert!(is_loopback_host("localhost:63342"));
        assert!(is_loopback_host("LOCALHOST"));
        assert!(is_loopback_host("127.0.0.1:80"));
        assert!(is_loopback_host("[::1]:63342"));
        assert!(!is_loopback_host("docs.example:80"));
    }

    #[test]
    fn test_normalize_segments() {
        assert_eq!(normalize_segments("/a/./b//c/"), Some(vec!["a", "b", "c"]));
        assert_eq!(normalize_segments("/a/b/../c"), Some(vec!["a", "c"]));
        assert_eq!(normalize_segments("/"), Some(vec![]));
        assert_eq!(normalize_segments("/a/../../etc/passwd"), None);
    }

    #[test]
    fn test_prefix_match() {
        let registry = registry();

        let matched = match_project(&registry, Some("localhost:63342"), "/shop/css/site.css").unwrap();
        assert_eq!(matched.project.name(), "shop");
        assert_eq!(matched.path, "css/site.css");
        assert!(!matched.is_custom_host);

        let matched = match_project(&registry, None, "/shop").unwrap();
        assert_eq!(matched.path, "");

        assert!(match_project(&registry, None, "/Shop/index.html").is_none());
        assert!(match_project(&registry, None, "/missing/index.html").is_none());
        assert!(match_project(&registry, None, "/").is_none());
    }

    #[test]
    fn test_dot_segments_cannot_switch_or_escape() {
        let registry = registry();

        let matched = match_project(&registry, None, "/other/../shop/a.html").unwrap();
        assert_eq!(matched.project.name(), "shop");
        assert_eq!(matched.path, "a.html");

        assert!(match_project(&registry, None, "/shop/../../secret").is_none());
    }

    #[test]
    fn test_custom_host_match() {
        let registry = registry();

        let matched = match_project(&registry, Some("Docs.Example:63342"), "/guide/").unwrap();
        assert_eq!(matched.project.name(), "docs.example");
        assert_eq!(matched.path, "guide");
        assert!(matched.is_custom_host);

        // Unknown hosts still fall back to prefix matching
        let matched = match_project(&registry, Some("unknown.test"), "/shop/").unwrap();
        assert!(!matched.is_custom_host);
    }
}
