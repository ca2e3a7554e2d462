//! Access token verification.
//!
//! Tokens are issued elsewhere; this module only checks them. A token can be
//! presented three ways:
//! - request header: accepted as-is
//! - query parameter: accepted and turned into a cookie for follow-up requests
//! - cookie: accepted as-is
//!
//! The returned header map is attached to every response of the request. An
//! empty map means no token was presented by query.

use std::collections::HashSet;

use axum::http::{header, HeaderMap, HeaderValue};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::http::request::RequestContext;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("access token required")]
    Missing,
    #[error("access token is not valid")]
    Invalid,
}

/// Verifies the access token of a request.
pub trait TokenValidator: Send + Sync {
    /// Extra response headers on success.
    fn validate(&self, ctx: &RequestContext) -> Result<HeaderMap, TokenError>;
}

/// Validator backed by a fixed set of accepted tokens.
#[derive(Debug, Clone)]
pub struct ConfiguredTokenValidator {
    allow_unsigned: bool,
    tokens: HashSet<String>,
    header: String,
    param: String,
    cookie_name: String,
}

impl ConfiguredTokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            allow_unsigned: config.allow_unsigned,
            tokens: config.tokens.iter().cloned().collect(),
            header: config.token_header.to_ascii_lowercase(),
            param: config.token_param.clone(),
            cookie_name: config.cookie_name.clone(),
        }
    }

    fn accept(&self, token: &str) -> Result<(), TokenError> {
        if self.tokens.contains(token) {
            Ok(())
        } else {
            Err(TokenError::Invalid)
        }
    }
}

impl Default for ConfiguredTokenValidator {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}

impl TokenValidator for ConfiguredTokenValidator {
    fn validate(&self, ctx: &RequestContext) -> Result<HeaderMap, TokenError> {
        if let Some(token) = ctx.header(self.header.as_str()) {
            self.accept(token)?;
            return Ok(HeaderMap::new());
        }

        if let Some(token) = ctx.query_param(&self.param) {
            self.accept(&token)?;
            let mut headers = HeaderMap::new();
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Strict",
                self.cookie_name, token
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.insert(header::SET_COOKIE, value);
            }
            return Ok(headers);
        }

        if let Some(token) = ctx.cookie(&self.cookie_name) {
            if self.accept(token).is_ok() {
                return Ok(HeaderMap::new());
            }
        }

        if self.allow_unsigned {
            Ok(HeaderMap::new())
        } else {
            Err(TokenError::Missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderName;

    fn validator(allow_unsigned: bool) -> ConfiguredTokenValidator {
        ConfiguredTokenValidator::new(&AuthConfig {
            allow_unsigned,
            tokens: vec!["t0ken".into()],
            ..Default::default()
        })
    }

    fn with_header(name: &'static str, value: &'static str) -> RequestContext {
        let mut ctx = RequestContext::default();
        ctx.headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        ctx
    }

    #[test]
    fn test_unsigned_requests() {
        let ctx = RequestContext::default();

        assert_eq!(validator(true).validate(&ctx), Ok(HeaderMap::new()));
        assert_eq!(validator(false).validate(&ctx), Err(TokenError::Missing));
    }

    #[test]
    fn test_header_token() {
        let v = validator(false);

        assert_eq!(v.validate(&with_header("x-server-token", "t0ken")), Ok(HeaderMap::new()));
        assert_eq!(
            v.validate(&with_header("x-server-token", "wrong")),
            Err(TokenError::Invalid)
        );
        // A wrong token is rejected even when unsigned requests are allowed
        assert_eq!(
            validator(true).validate(&with_header("x-server-token", "wrong")),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_query_token_sets_cookie() {
        let ctx = RequestContext {
            query: Some("_token=t0ken".into()),
            ..Default::default()
        };

        let headers = validator(false).validate(&ctx).unwrap();
        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("server-token=t0ken;"));
    }

    #[test]
    fn test_cookie_token() {
        let v = validator(false);

        assert_eq!(v.validate(&with_header("cookie", "server-token=t0ken")), Ok(HeaderMap::new()));
        assert_eq!(
            v.validate(&with_header("cookie", "server-token=stale")),
            Err(TokenError::Missing)
        );
    }
}
