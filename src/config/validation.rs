//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, cache capacity > 0)
//! - Check project names are unique and usable as URL segments / host names
//! - Check index file names and tokens are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WebServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::WebServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),
    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("path cache capacity must be greater than zero")]
    ZeroCacheCapacity,
    #[error("at least one index file name is required")]
    NoIndexFiles,
    #[error("index file name `{0}` must be a plain file name")]
    IndexFileName(String),
    #[error("project name `{0}` is not a valid path segment")]
    ProjectName(String),
    #[error("duplicate project name `{0}`")]
    DuplicateProject(String),
    #[error("module `{module}` of project `{project}` declares no source roots")]
    NoRoots { project: String, module: String },
    #[error("access tokens may only contain visible ASCII characters other than `;,\"\\`")]
    TokenCharacters,
    #[error("`{0}` must not be empty")]
    Empty(&'static str),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &WebServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.serve.cache_capacity == 0 {
        errors.push(ValidationError::ZeroCacheCapacity);
    }

    if config.serve.index_files.is_empty() {
        errors.push(ValidationError::NoIndexFiles);
    }
    for name in &config.serve.index_files {
        if !is_plain_file_name(name) {
            errors.push(ValidationError::IndexFileName(name.clone()));
        }
    }

    let mut seen = HashSet::new();
    for project in &config.projects {
        if !is_plain_file_name(&project.name) || project.name.chars().any(char::is_whitespace) {
            errors.push(ValidationError::ProjectName(project.name.clone()));
        }
        if !seen.insert(project.name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateProject(project.name.clone()));
        }
        for module in &project.modules {
            if module.roots.is_empty() {
                errors.push(ValidationError::NoRoots {
                    project: project.name.clone(),
                    module: module.name.clone(),
                });
            }
        }
    }

    if config.auth.tokens.iter().any(|token| !is_cookie_safe(token)) {
        errors.push(ValidationError::TokenCharacters);
    }
    if config.auth.token_header.is_empty() {
        errors.push(ValidationError::Empty("auth.token_header"));
    }
    if config.auth.token_param.is_empty() {
        errors.push(ValidationError::Empty("auth.token_param"));
    }
    if config.auth.cookie_name.is_empty() {
        errors.push(ValidationError::Empty("auth.cookie_name"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn is_cookie_safe(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ModuleConfig, ProjectConfig};

    fn project(name: &str) -> ProjectConfig {
        ProjectConfig {
            name: name.to_string(),
            modules: vec![ModuleConfig {
                name: "main".into(),
                library: false,
                roots: vec!["web".into()],
            }],
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&WebServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = WebServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.serve.cache_capacity = 0;
        config.serve.index_files = vec!["sub/index.html".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("not-an-address".into()),
                ValidationError::ZeroTimeout,
                ValidationError::ZeroCacheCapacity,
                ValidationError::IndexFileName("sub/index.html".into()),
            ]
        );
    }

    #[test]
    fn test_project_names() {
        let mut config = WebServerConfig::default();
        config.projects = vec![project("site"), project("Site"), project("a/b"), project("")];

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateProject("Site".into())));
        assert!(errors.contains(&ValidationError::ProjectName("a/b".into())));
        assert!(errors.contains(&ValidationError::ProjectName("".into())));
    }

    #[test]
    fn test_module_without_roots() {
        let mut config = WebServerConfig::default();
        let mut site = project("site");
        site.modules[0].roots.clear();
        config.projects.push(site);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::NoRoots {
                project: "site".into(),
                module: "main".into(),
            }]
        );
    }

    #[test]
    fn test_token_characters() {
        let mut config = WebServerConfig::default();
        config.auth.tokens = vec!["good-token".into(), "bad;token".into()];

        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::TokenCharacters])
        );
    }
}
