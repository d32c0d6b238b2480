//! End-to-end dispatch tests over a real socket.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use trie_router::config::{RouteConfig, ServerConfig};
use trie_router::http::{build_route_table, Context, HttpServer, X_REQUEST_ID};

mod common;

async fn get(client: &reqwest::Client, url: String) -> (u16, String) {
    let response = client.get(url).send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_static_routes_over_http() {
    let mut config = ServerConfig::default();
    config.routes.push(RouteConfig::new("GET", "/", "index"));
    config.routes.push(RouteConfig::new("GET", "/files/*", "some file"));
    config.routes.push(RouteConfig::new("GET", "/files/readme", "the readme"));
    config.routes.push(RouteConfig::new("GET", "/a/b/c", "abc"));

    let server = common::start_server(HttpServer::from_config(config).unwrap()).await;
    let client = reqwest::Client::new();

    assert_eq!(get(&client, server.url("/")).await, (200, "index".into()));
    assert_eq!(get(&client, server.url("/files/readme")).await, (200, "the readme".into()));
    assert_eq!(get(&client, server.url("/files/other")).await, (200, "some file".into()));
    assert_eq!(get(&client, server.url("/a/b")).await.0, 404);
    assert_eq!(get(&client, server.url("/nope")).await.0, 404);

    let response = client.post(server.url("/")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert!(response.headers().contains_key(X_REQUEST_ID.as_str()));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_concurrent_lookups() {
    let mut server = HttpServer::new(ServerConfig::default());
    server
        .get("/items/*", |ctx: Context| async move { ctx.path().to_string().into_response() })
        .unwrap();
    let server = common::start_server(server).await;
    let client = reqwest::Client::new();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            let url = server.url(&format!("/items/{}", i));
            tokio::spawn(async move { get(&client, url).await })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap(), (200, format!("/items/{}", i)));
    }

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_route_table_replaced_while_serving() {
    let mut server = HttpServer::new(ServerConfig::default());
    server
        .get("/version", |_ctx: Context| async { "v1".into_response() })
        .unwrap();
    let server = common::start_server(server).await;
    let client = reqwest::Client::new();

    assert_eq!(get(&client, server.url("/version")).await, (200, "v1".into()));

    let next = build_route_table(&[
        RouteConfig::new("GET", "/version", "v2"),
        RouteConfig::new("GET", "/new", "fresh"),
    ])
    .unwrap();
    server.table_tx.send(next).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(get(&client, server.url("/version")).await, (200, "v2".into()));
    assert_eq!(get(&client, server.url("/new")).await, (200, "fresh".into()));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_status_passthrough() {
    let mut server = HttpServer::new(ServerConfig::default());
    server
        .delete("/things/*", |_ctx: Context| async { StatusCode::NO_CONTENT.into_response() })
        .unwrap();
    let server = common::start_server(server).await;
    let client = reqwest::Client::new();

    let response = client.delete(server.url("/things/1")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 204);

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}
