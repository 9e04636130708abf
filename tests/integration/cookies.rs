//! Cookie jar tests: inbound parsing and Set-Cookie emission.

use crate::helpers::*;
use reqwest::StatusCode;
use std::time::Duration;
use webparts::prelude::*;

fn echo_cookie() -> impl Part {
    from_fn(|next: Next, ctx: Context| -> Task {
        let value = ctx.cookie("user").unwrap_or("anonymous").to_string();
        plain_text(value).call(next, ctx)
    })
}

/// Test inbound cookies are decoded
#[tokio::test]
async fn test_read_cookies() {
    let server = TestServer::start(compose(read_cookies(), echo_cookie())).await;

    let resp = server
        .get_with_headers("/", &[("cookie", "theme=dark; user=J%C3%BCrgen")])
        .await;
    assert_status(&resp, StatusCode::OK);
    assert_body(resp, "Jürgen").await;

    assert_body(server.get("/").await, "anonymous").await;
}

/// Test pending cookies become Set-Cookie headers, last write wins
#[tokio::test]
async fn test_set_cookie_headers() {
    let app = chain![
        set_cookie(Cookie::new("session", "first")),
        set_cookie(
            Cookie::new("prefs", "a b")
                .path("/")
                .expires(Expiration::MaxAge(Duration::from_secs(60)))
        ),
        set_cookie(Cookie::new("session", "second").http_only(true)),
        plain_text("ok"),
    ];
    let server = TestServer::start(app).await;
    let resp = server.get("/").await;

    let cookies: Vec<String> = resp
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        cookies,
        vec!["session=second; HttpOnly", "prefs=a%20b; Max-Age=60; Path=/"]
    );
}

/// Test cookies set on a declined branch are not emitted
#[tokio::test]
async fn test_declined_branch_cookies_discarded() {
    let app = choose![
        chain![set_cookie(Cookie::new("lost", "1")), path("/never")],
        plain_text("ok"),
    ];
    let server = TestServer::start(app).await;
    let resp = server.get("/").await;

    assert_no_header(&resp, "set-cookie");
    assert_body(resp, "ok").await;
}
