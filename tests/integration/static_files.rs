//! Static file serving tests

use crate::helpers::*;
use reqwest::StatusCode;
use std::fs;
use tempfile::TempDir;
use webparts::prelude::*;

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("styles.css"), "body { color: red; }").unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("index.html"), "<h1>docs</h1>").unwrap();
    dir
}

/// Test serving a CSS file
#[tokio::test]
async fn test_serve_css_file() {
    let dir = fixture();
    let server = TestServer::start(static_files(dir.path(), "/static")).await;
    let resp = server.get("/static/styles.css").await;

    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/css");
    assert_header(&resp, "content-length", "20");
    assert_body(resp, "body { color: red; }").await;
}

/// Test directory paths serve index.html
#[tokio::test]
async fn test_directory_index() {
    let dir = fixture();
    let server = TestServer::start(static_files(dir.path(), "/static")).await;

    assert_body(server.get("/static/").await, "<h1>home</h1>").await;
    assert_body(server.get("/static/docs/").await, "<h1>docs</h1>").await;
}

/// Test If-Modified-Since equal to Last-Modified yields 304
#[tokio::test]
async fn test_not_modified() {
    let dir = fixture();
    let server = TestServer::start(static_files(dir.path(), "/static")).await;

    let resp = server.get("/static/styles.css").await;
    let last_modified = resp
        .headers()
        .get("last-modified")
        .expect("Last-Modified missing")
        .to_str()
        .unwrap()
        .to_string();

    let resp = server
        .get_with_headers("/static/styles.css", &[("if-modified-since", &last_modified)])
        .await;
    assert_status(&resp, StatusCode::NOT_MODIFIED);
}

/// Test missing files fall through to 404
#[tokio::test]
async fn test_static_file_not_found() {
    let dir = fixture();
    let server = TestServer::start(static_files(dir.path(), "/static")).await;
    let resp = server.get("/static/nonexistent.css").await;

    assert_status(&resp, StatusCode::NOT_FOUND);
    assert_body(resp, "Not found").await;
}

/// Test a declined static lookup lets later routes answer
#[tokio::test]
async fn test_fallthrough_to_next_route() {
    let dir = fixture();
    let app = choose![static_files(dir.path(), "/"), plain_text("dynamic")];
    let server = TestServer::start(app).await;

    assert_body(server.get("/styles.css").await, "body { color: red; }").await;
    assert_body(server.get("/generated").await, "dynamic").await;
}

/// Test directory traversal protection
#[tokio::test]
async fn test_directory_traversal_protection() {
    let dir = fixture();
    let inner = dir.path().join("docs");
    let server = TestServer::start(static_files(&inner, "/static")).await;

    let resp = server.get("/static/..%2fstyles.css").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

/// Test a client date later than the file's modification time yields 304
#[tokio::test]
async fn test_not_modified_for_later_date() {
    let dir = fixture();
    let server = TestServer::start(static_files(dir.path(), "/static")).await;

    let resp = server
        .get_with_headers(
            "/static/styles.css",
            &[("if-modified-since", "Fri, 01 Jan 2100 00:00:00 GMT")],
        )
        .await;
    assert_status(&resp, StatusCode::NOT_MODIFIED);
}

/// Test an open failure other than a missing file is a 500 for that request
#[tokio::test]
async fn test_open_failure_is_internal_error() {
    let dir = fixture();
    let server = TestServer::start(static_files(dir.path(), "/static")).await;

    let resp = server.get("/static/styles.css/child").await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body(resp, "Internal Server Error").await;

    assert_status(&server.get("/static/styles.css").await, StatusCode::OK);
}
