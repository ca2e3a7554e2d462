//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use builtin_server::config::{ModuleConfig, ProjectConfig, WebServerConfig};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BROWSER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Project `shop` with source root `<tmp>/web`:
///
/// ```text
/// secret.txt              (outside the root)
/// web/index.html
/// web/app.js
/// web/.env
/// web/.git/config
/// web/docs/index.html
/// web/empty/
/// web/login/index.php
/// ```
pub fn project_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let web = dir.path().join("web");
    for sub in ["docs", "empty", "login", ".git"] {
        fs::create_dir_all(web.join(sub)).unwrap();
    }
    fs::write(dir.path().join("secret.txt"), "secret").unwrap();
    fs::write(web.join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(web.join("app.js"), "console.log('app');").unwrap();
    fs::write(web.join(".env"), "TOKEN=1").unwrap();
    fs::write(web.join(".git/config"), "[core]").unwrap();
    fs::write(web.join("docs/index.html"), "<h1>docs</h1>").unwrap();
    fs::write(web.join("login/index.php"), "<?php login();").unwrap();
    dir
}

pub fn project_config(name: &str, root: &Path) -> ProjectConfig {
    ProjectConfig {
        name: name.into(),
        modules: vec![ModuleConfig {
            name: "web".into(),
            library: false,
            roots: vec![root.to_path_buf()],
        }],
    }
}

/// Default configuration serving `project_tree()` as `shop`.
pub fn config_for(dir: &TempDir) -> WebServerConfig {
    let mut config = WebServerConfig::default();
    config.projects.push(project_config("shop", &dir.path().join("web")));
    config
}

/// GET `uri` on host `localhost` with no other headers.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap()
}

/// GET `uri` the way a browser tab opened on the URL would.
pub fn navigate(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(header::USER_AGENT, BROWSER_AGENT)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}
