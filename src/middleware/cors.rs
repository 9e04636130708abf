//! Cross-origin resource sharing.

use std::fmt;
use std::sync::Arc;

use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};

use crate::core::{Context, Method};
use crate::part::{Next, Part, Task};

/// Which origins receive CORS headers.
#[derive(Clone, Default)]
pub enum AllowedOrigin {
    #[default]
    Any,
    /// Exact origins, compared ignoring ASCII case.
    OneOf(Vec<String>),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl AllowedOrigin {
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            AllowedOrigin::Any => true,
            AllowedOrigin::OneOf(list) => list.iter().any(|o| o.eq_ignore_ascii_case(origin)),
            AllowedOrigin::Predicate(f) => f(origin),
        }
    }
}

impl fmt::Debug for AllowedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowedOrigin::Any => f.write_str("Any"),
            AllowedOrigin::OneOf(list) => f.debug_tuple("OneOf").field(list).finish(),
            AllowedOrigin::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// CORS configuration.
#[derive(Clone, Debug, Default)]
pub struct CorsConfig {
    pub allowed_origin: AllowedOrigin,
    /// Value of `Access-Control-Allow-Credentials`.
    pub allow_cookies: bool,
    /// `Access-Control-Max-Age` in seconds.
    pub max_age: Option<u64>,
    /// `Access-Control-Expose-Headers` value.
    pub expose_headers: Option<String>,
}

impl CorsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_origin(mut self, allowed: AllowedOrigin) -> Self {
        self.allowed_origin = allowed;
        self
    }

    pub fn allow_cookies(mut self, allow: bool) -> Self {
        self.allow_cookies = allow;
        self
    }

    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn expose_headers(mut self, headers: impl Into<String>) -> Self {
        self.expose_headers = Some(headers.into());
        self
    }
}

/// Part produced by [`cors`].
pub struct Cors {
    allowed_origin: AllowedOrigin,
    credentials: HeaderValue,
    max_age: Option<HeaderValue>,
    expose_headers: Option<HeaderValue>,
}

/// Add CORS response headers for allowed origins.
///
/// Requests without `Origin`, and requests from origins that are not allowed,
/// pass through untouched. Preflight requests are not answered here; route
/// `OPTIONS` explicitly to end them.
pub fn cors(config: CorsConfig) -> Cors {
    let expose_headers = config
        .expose_headers
        .and_then(|v| match HeaderValue::try_from(v) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("invalid Access-Control-Expose-Headers value ignored");
                None
            }
        });

    Cors {
        allowed_origin: config.allowed_origin,
        credentials: HeaderValue::from_static(if config.allow_cookies { "true" } else { "false" }),
        max_age: config.max_age.map(HeaderValue::from),
        expose_headers,
    }
}

impl Part for Cors {
    fn call(&self, next: Next, ctx: Context) -> Task {
        let request = ctx.request();
        let Some(origin) = request.headers().get(ORIGIN) else {
            return next.run(ctx);
        };
        let allowed = origin
            .to_str()
            .is_ok_and(|o| self.allowed_origin.allows(o));
        if !allowed {
            tracing::debug!(origin = ?origin, "origin not allowed, no CORS headers");
            return next.run(ctx);
        }

        let origin = origin.clone();
        let request_method = (*request.method() == Method::Options)
            .then(|| request.headers().get(ACCESS_CONTROL_REQUEST_METHOD).cloned())
            .flatten();
        let request_headers = request.headers().get(ACCESS_CONTROL_REQUEST_HEADERS).cloned();

        let mut ctx = ctx
            .with_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin)
            .with_header(ACCESS_CONTROL_ALLOW_CREDENTIALS, self.credentials.clone());
        if let Some(method) = request_method {
            ctx = ctx.with_header(ACCESS_CONTROL_ALLOW_METHODS, method);
        }
        if let Some(headers) = request_headers {
            ctx = ctx.with_header(ACCESS_CONTROL_ALLOW_HEADERS, headers);
        }
        if let Some(ref max_age) = self.max_age {
            ctx = ctx.with_header(ACCESS_CONTROL_MAX_AGE, max_age.clone());
        }
        if let Some(ref expose) = self.expose_headers {
            ctx = ctx.with_header(ACCESS_CONTROL_EXPOSE_HEADERS, expose.clone());
        }
        next.run(ctx)
    }
}
