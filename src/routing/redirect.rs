//! Directory redirects.
//!
//! # Responsibilities
//! - Decide when a directory URL must gain its trailing slash
//! - Detect fallback resources served for what was meant as a directory
//! - Compose the redirect target
//!
//! # Design Decisions
//! - Directory redirects are decided only once an index is known to exist,
//!   so redirects never reveal that a bare directory exists
//! - Targets are absolute when the Host header is a plain `host[:port]`
//!   authority, root-relative otherwise
//! - The query string is not carried over

use axum::http::uri::Authority;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::http::request::RequestContext;
use crate::project::PathInfo;

/// Characters escaped inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn ends_with_slash(path: &str) -> bool {
    path.ends_with('/')
}

/// True if the last segment of `path` is exactly `name`.
pub fn ends_with_name(path: &str, name: &str) -> bool {
    path.rsplit('/').next() == Some(name)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectPolicy;

impl RedirectPolicy {
    /// A directory with an index was requested without its trailing slash.
    pub fn should_redirect_to_directory(&self, ctx: &RequestContext) -> bool {
        !ends_with_slash(&ctx.raw_path)
    }

    /// A catch-all resource was resolved for `/name` where the resource's own
    /// directory is called `name`: the client meant the directory.
    ///
    /// Only consulted when no index was used and the resource's name differs
    /// from the last requested segment.
    pub fn is_fallback_for_directory(&self, ctx: &RequestContext, info: &PathInfo) -> bool {
        if ends_with_slash(&ctx.raw_path) {
            return false;
        }
        info.parent_name()
            .map(|parent| !parent.is_empty() && ends_with_name(&ctx.path, &parent))
            .unwrap_or(false)
    }

    /// Slash-terminated directory target for the request.
    pub fn directory_location(&self, ctx: &RequestContext) -> String {
        let prefix = (!ctx.is_custom_host).then_some(ctx.project_name.as_str());
        let mut target = String::from("/");
        for segment in prefix
            .into_iter()
            .chain(ctx.path.split('/'))
            .filter(|segment| !segment.is_empty())
        {
            target.extend(utf8_percent_encode(segment, SEGMENT));
            target.push('/');
        }

        match ctx.host.as_deref().and_then(redirect_authority) {
            Some(authority) => format!("http://{authority}{target}"),
            None => target,
        }
    }
}

/// `host` if it parses as an authority without user info.
fn redirect_authority(host: &str) -> Option<Authority> {
    let authority = host.parse::<Authority>().ok()?;
    (!authority.as_str().contains('@')).then_some(authority)
}
