//! Pass-through state transformers.
//!
//! Every part in this module always calls `next`, with a context that differs
//! from its input in exactly one respect. The response shortcuts at the bottom
//! are compositions of those single-field setters.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;

use crate::core::{Body, Context, Error, Result, StreamFactory};
use crate::part::{fail, from_fn, map, Next, Part, Task};

/// Replace the response status.
pub fn set_status(status: StatusCode) -> impl Part {
    map(move |ctx: Context| ctx.with_status(status))
}

#[derive(Clone, Copy, Debug)]
enum HeaderOp {
    Replace,
    IfAbsent,
    Append,
}

/// Header setter with its name and value validated up front.
pub struct SetHeader {
    op: HeaderOp,
    header: Option<(HeaderName, HeaderValue)>,
}

impl SetHeader {
    fn new(op: HeaderOp, name: &str, value: &str) -> Self {
        let header = match validate_header(name, value) {
            Ok(header) => Some(header),
            Err(e) => {
                tracing::warn!(error = %e, ?op, "part will pass through");
                None
            }
        };
        Self { op, header }
    }
}

fn validate_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::InvalidHeader(format!("name {:?}", name)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| Error::InvalidHeader(format!("value for {}", name)))?;
    Ok((header_name, header_value))
}

impl Part for SetHeader {
    fn call(&self, next: Next, ctx: Context) -> Task {
        let Some((name, value)) = self.header.clone() else {
            return next.run(ctx);
        };
        let ctx = match self.op {
            HeaderOp::Replace => ctx.with_header(name, value),
            HeaderOp::IfAbsent => ctx.with_header_if_absent(name, value),
            HeaderOp::Append => ctx.with_appended_header(name, value),
        };
        next.run(ctx)
    }
}

/// Replace every value of `name` with `value`.
pub fn set_header(name: &str, value: &str) -> SetHeader {
    SetHeader::new(HeaderOp::Replace, name, value)
}

/// Like [`set_header`], but an invalid name or value is an error instead of
/// a warn-logged pass-through.
pub fn try_set_header(name: &str, value: &str) -> Result<SetHeader> {
    let header = validate_header(name, value)?;
    Ok(SetHeader {
        op: HeaderOp::Replace,
        header: Some(header),
    })
}

/// Add `name: value` unless `name` is already set.
pub fn set_header_if_absent(name: &str, value: &str) -> SetHeader {
    SetHeader::new(HeaderOp::IfAbsent, name, value)
}

/// Append `name: value`; duplicates are kept.
pub fn add_header(name: &str, value: &str) -> SetHeader {
    SetHeader::new(HeaderOp::Append, name, value)
}

/// Set `Content-Type`.
pub fn set_mime(mime: &str) -> SetHeader {
    set_header(CONTENT_TYPE.as_str(), mime)
}

pub fn set_body(bytes: impl Into<Bytes>) -> impl Part {
    let body = Body::Buffer(bytes.into());
    map(move |ctx: Context| ctx.with_body(body.clone()))
}

pub fn set_body_chunks(chunks: Vec<Bytes>) -> impl Part {
    let body = Body::Chunks(chunks);
    map(move |ctx: Context| ctx.with_body(body.clone()))
}

pub fn set_body_stream(factory: StreamFactory) -> impl Part {
    let body = Body::Stream(factory);
    map(move |ctx: Context| ctx.with_body(body.clone()))
}

// Response shortcuts

/// Set status and body in one step.
pub fn respond(status: StatusCode, body: impl Into<Body>) -> impl Part {
    let body = body.into();
    map(move |ctx: Context| ctx.with_status(status).with_body(body.clone()))
}

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

fn typed_body(content_type: &'static str, body: Body) -> impl Part {
    map(move |ctx: Context| {
        ctx.with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
            .with_body(body.clone())
    })
}

/// `text/plain` body.
pub fn plain_text(text: impl Into<String>) -> impl Part {
    typed_body(TEXT_PLAIN, Body::from(text.into()))
}

/// `text/html` body.
pub fn html(markup: impl Into<String>) -> impl Part {
    typed_body(TEXT_HTML, Body::from(markup.into()))
}

/// `application/json` body, serialized once here.
///
/// A value that fails to serialize yields a part that declines.
pub fn json<T: Serialize + ?Sized>(value: &T) -> impl Part {
    let body = match serde_json::to_vec(value) {
        Ok(bytes) => Some(Body::Buffer(Bytes::from(bytes))),
        Err(e) => {
            tracing::warn!(error = %e, "json serialization failed, part will decline");
            None
        }
    };
    from_fn(move |next: Next, ctx: Context| match &body {
        Some(body) => next.run(
            ctx.with_header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
                .with_body(body.clone()),
        ),
        None => fail(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::testing::{context, header_count};
    use crate::part::{compose, PartExt};
    use futures_util::{stream, StreamExt};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_set_status() {
        let ctx = set_status(StatusCode::NO_CONTENT)
            .run(context("GET", "/"))
            .await
            .unwrap();
        assert_eq!(ctx.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_set_header_twice_keeps_one_value() {
        let part = compose(set_header("x-a", "1"), set_header("x-a", "2"));
        let ctx = part.run(context("GET", "/")).await.unwrap();
        assert_eq!(header_count(ctx.headers(), "x-a"), 1);
        assert_eq!(ctx.header("x-a"), Some("2"));
    }

    #[tokio::test]
    async fn test_add_header_twice_keeps_both() {
        let part = compose(add_header("x-a", "1"), add_header("x-a", "2"));
        let ctx = part.run(context("GET", "/")).await.unwrap();
        assert_eq!(header_count(ctx.headers(), "x-a"), 2);
    }

    #[tokio::test]
    async fn test_set_header_if_absent() {
        let part = compose(set_mime("text/css"), set_header_if_absent("content-type", "text/plain"));
        let ctx = part.run(context("GET", "/")).await.unwrap();
        assert_eq!(ctx.header("content-type"), Some("text/css"));

        let ctx = set_header_if_absent("x-b", "v")
            .run(context("GET", "/"))
            .await
            .unwrap();
        assert_eq!(ctx.header("x-b"), Some("v"));
    }

    #[tokio::test]
    async fn test_try_set_header() {
        let err = try_set_header("bad header", "x").err().unwrap();
        assert!(matches!(err, Error::InvalidHeader(_)));
        assert!(matches!(
            try_set_header("x-ok", "line\nbreak"),
            Err(Error::InvalidHeader(_))
        ));

        let ctx = try_set_header("x-ok", "1")
            .unwrap()
            .run(context("GET", "/"))
            .await
            .unwrap();
        assert_eq!(ctx.header("x-ok"), Some("1"));
    }

    #[tokio::test]
    async fn test_invalid_header_passes_through() {
        let ctx = set_header("bad header", "x")
            .run(context("GET", "/"))
            .await
            .unwrap();
        assert!(ctx.headers().is_empty());

        let ctx = add_header("x-ok", "line\nbreak")
            .run(context("GET", "/"))
            .await
            .unwrap();
        assert!(ctx.headers().is_empty());
    }

    #[tokio::test]
    async fn test_body_setters_replace_previous_variant() {
        let part = compose(
            set_body_chunks(vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]),
            set_body("c"),
        );
        let ctx = part.run(context("GET", "/")).await.unwrap();
        assert!(matches!(ctx.body(), Body::Buffer(b) if b.as_ref() == b"c"));

        let factory = StreamFactory::new(|| stream::iter(vec![Ok(Bytes::from_static(b"s"))]).boxed());
        let ctx = compose(set_body("x"), set_body_stream(factory))
            .run(context("GET", "/"))
            .await
            .unwrap();
        assert!(matches!(ctx.body(), Body::Stream(_)));
    }

    #[tokio::test]
    async fn test_respond_and_text_shortcuts() {
        let ctx = respond(StatusCode::CREATED, "made")
            .run(context("POST", "/"))
            .await
            .unwrap();
        assert_eq!(ctx.status(), StatusCode::CREATED);
        assert_eq!(ctx.body().to_bytes().unwrap().as_ref(), b"made");

        let ctx = html("<p>hi</p>").run(context("GET", "/")).await.unwrap();
        assert_eq!(ctx.header("content-type"), Some("text/html; charset=utf-8"));

        let ctx = plain_text("hi").run(context("GET", "/")).await.unwrap();
        assert_eq!(ctx.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(ctx.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_json_body() {
        let mut value = BTreeMap::new();
        value.insert("ok", true);
        let ctx = json(&value).run(context("GET", "/")).await.unwrap();
        assert_eq!(ctx.header("content-type"), Some("application/json"));
        assert_eq!(ctx.body().to_bytes().unwrap().as_ref(), br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_json_serialization_failure_declines() {
        // Non-string map keys cannot be represented in JSON.
        let mut value = BTreeMap::new();
        value.insert(vec![1u8], 1);
        assert!(json(&value).run(context("GET", "/")).await.is_none());
    }
}
