//! Routing predicates.
//!
//! Every matcher here is [`filter_p`] over a pure function of the context, so
//! all of them decline the same way: silently, by resolving to `None`.

mod format;

pub use format::{path_format, Capture, FromCapture, FromCaptures, PathFormat, PathFormatPart};

use regex::Regex;

use crate::core::{Context, Method, Result};
use crate::part::{filter_p, Part};

/// Path equals `expected` exactly.
pub fn path(expected: impl Into<String>) -> impl Part {
    let expected = expected.into();
    filter_p(move |ctx: &Context| ctx.request().path() == expected)
}

/// Path equals `expected`, ignoring ASCII case.
pub fn path_ci(expected: impl Into<String>) -> impl Part {
    let expected = expected.into();
    filter_p(move |ctx: &Context| ctx.request().path().eq_ignore_ascii_case(&expected))
}

/// Path starts with `prefix`.
pub fn path_prefix(prefix: impl Into<String>) -> impl Part {
    let prefix = prefix.into();
    filter_p(move |ctx: &Context| ctx.request().path().starts_with(prefix.as_str()))
}

/// Path starts with `prefix`, ignoring ASCII case.
pub fn path_prefix_ci(prefix: impl Into<String>) -> impl Part {
    let prefix = prefix.into();
    filter_p(move |ctx: &Context| starts_with_ignore_ascii_case(ctx.request().path(), &prefix))
}

/// Path matches `pattern` anywhere; anchor with `^`/`$` for a full match.
pub fn path_regex(pattern: &str) -> Result<impl Part> {
    let re = Regex::new(pattern)?;
    Ok(filter_p(move |ctx: &Context| re.is_match(ctx.request().path())))
}

/// Request method equals `expected`.
pub fn method(expected: Method) -> impl Part {
    filter_p(move |ctx: &Context| *ctx.request().method() == expected)
}

pub fn get() -> impl Part {
    method(Method::Get)
}

pub fn head() -> impl Part {
    method(Method::Head)
}

pub fn post() -> impl Part {
    method(Method::Post)
}

pub fn put() -> impl Part {
    method(Method::Put)
}

pub fn delete() -> impl Part {
    method(Method::Delete)
}

pub fn patch() -> impl Part {
    method(Method::Patch)
}

pub fn options() -> impl Part {
    method(Method::Options)
}

/// `Host` header equals `expected`, ignoring ASCII case.
pub fn host(expected: impl Into<String>) -> impl Part {
    let expected = expected.into();
    filter_p(move |ctx: &Context| {
        ctx.request()
            .host()
            .is_some_and(|h| h.eq_ignore_ascii_case(&expected))
    })
}

#[inline]
fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
