//! Navigational disclosure gate.
//!
//! A browser tab opened directly on `http://localhost:port/project/secret.yml`
//! carries no token, no `Origin` and no `Referer`. Such requests may only open
//! page-like resources; everything else answers 404. Assets loaded by a page
//! normally carry a referrer and are not affected.
//!
//! Browser classification is a heuristic: this gate is a best-effort hardening
//! layer, not a security boundary.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use axum::http::{header, HeaderMap};

use crate::http::request::RequestContext;
use crate::security::access_control::Denial;

/// Classifies requests as ordinary top-level browser navigations.
pub trait NavigationClassifier: Send + Sync + fmt::Debug {
    fn is_browser_navigation(&self, headers: &HeaderMap) -> bool;
}

/// Treats any `Mozilla/5.0` user agent as a regular browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentClassifier;

impl NavigationClassifier for UserAgentClassifier {
    fn is_browser_navigation(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(|agent| agent.starts_with("Mozilla/5.0"))
            .unwrap_or(false)
    }
}

/// Allow-list of extensions plain navigations may open.
#[derive(Debug, Clone, Default)]
pub struct DisclosureGate {
    extensions: BTreeSet<String>,
}

impl DisclosureGate {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn can_be_accessed_directly(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Deny unauthenticated, referrer-less browser navigations to resources
    /// that are not on the allow-list.
    pub fn check(
        &self,
        ctx: &RequestContext,
        extra_headers: &HeaderMap,
        name: &str,
    ) -> Result<(), Denial> {
        let unvouched = extra_headers.is_empty()
            && !ctx.has_origin()
            && !ctx.has_referer()
            && ctx.is_browser_navigation;

        if unvouched && !self.can_be_accessed_directly(name) {
            Err(Denial::DirectNavigation)
        } else {
            Ok(())
        }
    }
}
