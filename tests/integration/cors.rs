//! CORS middleware tests

use crate::helpers::*;
use reqwest::{Method as HttpMethod, StatusCode};
use webparts::prelude::*;

fn app() -> impl Part {
    let config = CorsConfig::new()
        .allowed_origin(AllowedOrigin::OneOf(vec!["http://x".to_string()]))
        .allow_cookies(true)
        .max_age(600);
    chain![
        cors(config),
        choose![
            chain![options(), respond(StatusCode::NO_CONTENT, Body::Empty)],
            plain_text("data"),
        ],
    ]
}

/// Test requests without Origin get no CORS headers
#[tokio::test]
async fn test_no_origin() {
    let server = TestServer::start(app()).await;
    let resp = server.get("/").await;

    assert_status(&resp, StatusCode::OK);
    assert_no_header(&resp, "access-control-allow-origin");
    assert_no_header(&resp, "access-control-allow-credentials");
}

/// Test a disallowed origin passes through without CORS headers
#[tokio::test]
async fn test_disallowed_origin() {
    let server = TestServer::start(app()).await;
    let resp = server.get_with_headers("/", &[("origin", "http://evil")]).await;

    assert_status(&resp, StatusCode::OK);
    assert_no_header(&resp, "access-control-allow-origin");
    assert_body(resp, "data").await;
}

/// Test an allowed origin is echoed with credentials
#[tokio::test]
async fn test_allowed_origin() {
    let server = TestServer::start(app()).await;
    let resp = server.get_with_headers("/", &[("origin", "http://x")]).await;

    assert_header(&resp, "access-control-allow-origin", "http://x");
    assert_header(&resp, "access-control-allow-credentials", "true");
    assert_header(&resp, "access-control-max-age", "600");
    assert_no_header(&resp, "access-control-allow-methods");
}

/// Test preflight echoes requested method and headers
#[tokio::test]
async fn test_preflight() {
    let server = TestServer::start(app()).await;
    let resp = server
        .request(
            HttpMethod::OPTIONS,
            "/",
            &[
                ("origin", "http://x"),
                ("access-control-request-method", "PUT"),
                ("access-control-request-headers", "x-token"),
            ],
        )
        .await;

    assert_status(&resp, StatusCode::NO_CONTENT);
    assert_header(&resp, "access-control-allow-methods", "PUT");
    assert_header(&resp, "access-control-allow-headers", "x-token");
}
