//! Basic HTTP tests: routing, 404 fallback, HEAD, formatted paths.

use crate::helpers::*;
use reqwest::StatusCode;
use webparts::prelude::*;

fn hello_app() -> impl Part {
    compose(path("/"), respond(StatusCode::OK, "hello"))
}

/// Test a matched route
#[tokio::test]
async fn test_get_hello() {
    let server = TestServer::start(hello_app()).await;
    let resp = server.get("/").await;

    assert_status(&resp, StatusCode::OK);
    assert_body(resp, "hello").await;
}

/// Test 404 fallback for an unmatched path
#[tokio::test]
async fn test_404_not_found() {
    let server = TestServer::start(hello_app()).await;
    let resp = server.get("/missing").await;

    assert_status(&resp, StatusCode::NOT_FOUND);
    assert_header_starts_with(&resp, "content-type", "text/plain");
    assert_body(resp, "Not found").await;
}

/// Test that alternatives are tried in order
#[tokio::test]
async fn test_choose_routes() {
    let app = choose![
        chain![get(), path("/a"), plain_text("get a")],
        chain![post(), path("/a"), plain_text("post a")],
        chain![path_prefix("/api/"), json(&serde_json::json!({"api": true}))],
    ];
    let server = TestServer::start(app).await;

    assert_body(server.get("/a").await, "get a").await;

    let resp = server.request(reqwest::Method::POST, "/a", &[]).await;
    assert_body(resp, "post a").await;

    let resp = server.get("/api/anything").await;
    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "application/json");
    let value: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(value["api"], true);

    let resp = server.request(reqwest::Method::DELETE, "/a", &[]).await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

/// Test formatted path captures
#[tokio::test]
async fn test_path_format() {
    let app = path_format("/add/%d/%d", |(a, b): (i64, i64)| {
        plain_text((a + b).to_string())
    })
    .unwrap();
    let server = TestServer::start(app).await;

    assert_body(server.get("/add/3/4").await, "7").await;
    assert_body(server.get("/add/-3/4").await, "1").await;

    assert_status(&server.get("/add/a/4").await, StatusCode::NOT_FOUND);
    assert_status(&server.get("/add/3").await, StatusCode::NOT_FOUND);
}

/// Test HEAD request carries headers without a body
#[tokio::test]
async fn test_head_request() {
    let server = TestServer::start(compose(head(), plain_text("body"))).await;
    let resp = server.request(reqwest::Method::HEAD, "/", &[]).await;

    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/plain");
    assert_body(resp, "").await;
}

/// Test host matching is case-insensitive
#[tokio::test]
async fn test_host_routing() {
    let app = choose![
        chain![host("api.example.com"), plain_text("api")],
        plain_text("default"),
    ];
    let server = TestServer::start(app).await;

    let resp = server
        .get_with_headers("/", &[("host", "API.example.com")])
        .await;
    assert_body(resp, "api").await;
    assert_body(server.get("/").await, "default").await;
}

/// Test secure headers are applied
#[tokio::test]
async fn test_secure_headers() {
    let server = TestServer::start(compose(secure_headers(), plain_text("ok"))).await;
    let resp = server.get("/").await;

    assert_header(&resp, "x-frame-options", "SAMEORIGIN");
    assert_header(&resp, "x-content-type-options", "nosniff");
}

/// Test a single string capture taken without a tuple
#[tokio::test]
async fn test_path_format_single_string() {
    let app = path_format("/hello/%s", |name: String| plain_text(format!("Hello, {}!", name))).unwrap();
    let server = TestServer::start(app).await;

    assert_body(server.get("/hello/J%C3%BCrgen").await, "Hello, Jürgen!").await;
    assert_status(&server.get("/hello/").await, StatusCode::NOT_FOUND);
}
