//! End-to-end tests against a bound listener.

use std::net::SocketAddr;
use std::time::Duration;

use builtin_server::http::HttpServer;
use builtin_server::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

mod common;

use common::{config_for, project_config, project_tree};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_serves_redirects_and_shuts_down() {
    let dir = project_tree();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (_updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config_for(&dir));
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, config_updates, server_shutdown).await });

    let client = client();

    let res = client
        .get(format!("http://{addr}/shop/docs/"))
        .send()
        .await
        .expect("Server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "<h1>docs</h1>");

    let res = client.get(format!("http://{addr}/shop/docs")).send().await.unwrap();
    assert_eq!(res.status(), 301);
    assert_eq!(res.headers()["location"], format!("http://{addr}/shop/docs/").as_str());

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("Server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_reload_replaces_projects() {
    let first = project_tree();
    let second = project_tree();
    std::fs::write(second.path().join("web/app.js"), "reloaded();").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config_for(&first));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    let client = client();
    let res = client.get(format!("http://{addr}/blog/app.js")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let mut reloaded = config_for(&first);
    reloaded.projects = vec![project_config("blog", &second.path().join("web"))];
    updates.send(reloaded).unwrap();

    // The reload task runs concurrently; poll until the swap is visible
    let mut status = 0;
    for _ in 0..50 {
        let res = client.get(format!("http://{addr}/blog/app.js")).send().await.unwrap();
        status = res.status().as_u16();
        if status == 200 {
            assert_eq!(res.text().await.unwrap(), "reloaded();");
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(status, 200);

    let res = client.get(format!("http://{addr}/shop/app.js")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}
