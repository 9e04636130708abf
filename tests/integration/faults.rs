//! Handler faults are confined to the request that raised them.

use crate::helpers::*;
use reqwest::StatusCode;
use webparts::prelude::*;

fn app() -> impl Part {
    choose![
        chain![
            path("/panic"),
            from_fn(|_next: Next, _ctx: Context| -> Task { panic!("handler bug") }),
        ],
        chain![
            path("/panic-later"),
            from_fn(|_next: Next, _ctx: Context| -> Task {
                Box::pin(async { panic!("async handler bug") })
            }),
        ],
        chain![path("/"), plain_text("alive")],
    ]
}

/// Test a panicking part yields 500 and the server keeps serving
#[tokio::test]
async fn test_panic_yields_500() {
    let server = TestServer::start(app()).await;

    let resp = server.get("/panic").await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body(resp, "Internal Server Error").await;

    let resp = server.get("/panic-later").await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);

    let resp = server.get("/").await;
    assert_status(&resp, StatusCode::OK);
    assert_body(resp, "alive").await;
}

/// Test concurrent requests run independently
#[tokio::test]
async fn test_concurrent_requests() {
    let server = TestServer::start(app()).await;

    let (a, b, c) = tokio::join!(server.get("/"), server.get("/panic"), server.get("/"));
    assert_status(&a, StatusCode::OK);
    assert_status(&b, StatusCode::INTERNAL_SERVER_ERROR);
    assert_status(&c, StatusCode::OK);
}
