//! Bridge between hyper and the part pipeline.
//!
//! ```text
//! hyper Request ─▶ Context ─▶ choose([app, not_found]) ─▶ flush_cookies ─▶ hyper Response
//! ```

use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::sync::LazyLock;

use bytes::Bytes;
use futures_util::{stream, FutureExt, TryStreamExt};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Frame, Incoming};

use crate::core::{Body, ConnectionInfo, Context, Request};
use crate::mutation::{plain_text, set_status};
use crate::part::{choose, compose, BoxPart, Part, PartExt};

/// Body type handed to hyper.
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

static NOT_FOUND: LazyLock<BoxPart> = LazyLock::new(|| not_found().boxed());

/// `404` with a plain-text `Not found` body.
pub fn not_found() -> impl Part {
    compose(set_status(StatusCode::NOT_FOUND), plain_text("Not found"))
}

/// Run `app` for one request, falling back to [`not_found`].
///
/// Always yields a context: a panic inside the application is confined to
/// this request and turned into a `500`. Pending cookies are flushed into
/// `Set-Cookie` headers here and nowhere else.
pub async fn respond(app: BoxPart, ctx: Context) -> Context {
    let fallback = ctx.clone();
    let handler = choose(vec![app, NOT_FOUND.clone()]);

    // Build the task inside the future so a panic while constructing it is caught too.
    let outcome = AssertUnwindSafe(async move { handler.run(ctx).await })
        .catch_unwind()
        .await;

    match outcome {
        Ok(Some(ctx)) => ctx.flush_cookies(),
        Ok(None) => unreachable!("not-found fallback declined"),
        Err(panic) => {
            let reason = panic_message(&*panic);
            tracing::error!(
                request_id = fallback.request_id(),
                method = %fallback.request().method(),
                path = fallback.request().path(),
                panic = reason,
                "handler panicked"
            );
            internal_error(fallback)
        }
    }
}

fn internal_error(ctx: Context) -> Context {
    ctx.with_status(StatusCode::INTERNAL_SERVER_ERROR)
        .with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
        .with_body("Internal Server Error")
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

/// Convert a finished context into a hyper response.
pub fn into_response(ctx: Context) -> Response<ResponseBody> {
    let (status, headers, body) = ctx.into_response_parts();

    let body: ResponseBody = match body {
        Body::Empty => Empty::<Bytes>::new()
            .map_err(|never| match never {})
            .boxed_unsync(),
        Body::Buffer(bytes) => Full::new(bytes)
            .map_err(|never: Infallible| match never {})
            .boxed_unsync(),
        Body::Chunks(chunks) => {
            let frames = stream::iter(chunks
                .into_iter()
                .map(|c| Ok::<_, std::io::Error>(Frame::data(c))));
            StreamBody::new(frames).boxed_unsync()
        }
        Body::Stream(factory) => StreamBody::new(factory.open().map_ok(Frame::data)).boxed_unsync(),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// hyper service entry point.
pub async fn handle(
    app: BoxPart,
    connection: ConnectionInfo,
    req: http::Request<Incoming>,
) -> Result<Response<ResponseBody>, Infallible> {
    let ctx = Context::new(connection, Request::from(req));
    tracing::debug!(
        connection = connection.id,
        request_id = ctx.request_id(),
        method = %ctx.request().method(),
        path = ctx.request().path(),
        "request"
    );
    Ok(into_response(respond(app, ctx).await))
}
