//! Request/response context threaded through parts.

use std::cell::Cell;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http::header::{HeaderName, HeaderValue, SET_COOKIE};
use http::{HeaderMap, StatusCode};
use indexmap::IndexMap;

use super::body::Body;
use super::cookie;
use super::request::Request;

/// Identity of the connection a request arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Server-assigned connection number, unique per process.
    pub id: u64,
    /// Peer address, if known.
    pub remote_addr: Option<SocketAddr>,
}

impl ConnectionInfo {
    pub fn new(id: u64, remote_addr: Option<SocketAddr>) -> Self {
        Self { id, remote_addr }
    }
}

/// One in-flight request and the response being built for it.
///
/// A context is never changed in place: every `with_*` method consumes the
/// value and returns a new one differing only in the named field. The inbound
/// request is shared behind an `Arc`, so clones made by `choose` are cheap.
#[derive(Clone)]
pub struct Context {
    connection: ConnectionInfo,
    request: Arc<Request>,
    request_id: Arc<str>,
    started_at: Instant,
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
    cookies: Option<Arc<Vec<(String, String)>>>,
    pending_cookies: IndexMap<String, String>,
}

impl Context {
    /// Fresh context: status 200, no headers, empty body, no cookies.
    pub fn new(connection: ConnectionInfo, request: Request) -> Self {
        Self {
            connection,
            request: Arc::new(request),
            request_id: Arc::from(generate_request_id()),
            started_at: Instant::now(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Body::Empty,
            cookies: None,
            pending_cookies: IndexMap::new(),
        }
    }

    // Accessors

    #[inline]
    pub fn connection(&self) -> &ConnectionInfo {
        &self.connection
    }

    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Short random id for log correlation.
    #[inline]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First outbound value for `name`, if it is valid UTF-8.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Parsed inbound cookies; `None` until `read_cookies` has run.
    #[inline]
    pub fn cookies(&self) -> Option<&[(String, String)]> {
        self.cookies.as_deref().map(Vec::as_slice)
    }

    /// First inbound cookie named `name`.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies()?
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Pending Set-Cookie directive for `name` (the name is encoded first).
    pub fn pending_cookie(&self, name: &str) -> Option<&str> {
        self.pending_cookies
            .get(&cookie::encode(name))
            .map(String::as_str)
    }

    #[inline]
    pub fn pending_cookie_count(&self) -> usize {
        self.pending_cookies.len()
    }

    /// Elapsed time since the context was created.
    #[inline]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    // Replacements

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Replace every value of `name` with `value`.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add `name: value` only if `name` is not present yet.
    pub fn with_header_if_absent(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.entry(name).or_insert(value);
        self
    }

    /// Append `name: value`, keeping existing values.
    pub fn with_appended_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<(String, String)>) -> Self {
        self.cookies = Some(Arc::new(cookies));
        self
    }

    /// Insert or overwrite one pending directive under an already encoded key.
    pub fn with_pending_cookie(mut self, encoded_name: String, directive: String) -> Self {
        self.pending_cookies.insert(encoded_name, directive);
        self
    }

    /// Move pending cookies into `Set-Cookie` headers.
    ///
    /// Runs once per request, in the server adapter, after the chain resolved.
    pub(crate) fn flush_cookies(mut self) -> Self {
        for (name, directive) in std::mem::take(&mut self.pending_cookies) {
            match HeaderValue::try_from(directive) {
                Ok(value) => {
                    self.headers.append(SET_COOKIE, value);
                }
                Err(_) => {
                    tracing::warn!(cookie = %name, "dropping cookie with invalid directive");
                }
            }
        }
        self
    }

    /// Split off the outbound half for serialization.
    pub(crate) fn into_response_parts(self) -> (StatusCode, HeaderMap, Body) {
        (self.status, self.headers, self.body)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("connection", &self.connection)
            .field("method", self.request.method())
            .field("path", &self.request.path())
            .field("request_id", &self.request_id)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("pending_cookies", &self.pending_cookies.len())
            .finish()
    }
}

// ============================================================================
// Fast random ID generation with thread-local state
// ============================================================================

thread_local! {
    static RNG_STATE: Cell<u64> = Cell::new(init_rng_seed());
}

/// Initialize RNG seed from system entropy.
fn init_rng_seed() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{SystemTime, UNIX_EPOCH};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    hasher.write_u64(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64,
    );
    // xorshift must not start from zero
    hasher.finish() | 1
}

/// Fast random u64 using thread-local xorshift64.
#[inline]
fn rand_u64() -> u64 {
    RNG_STATE.with(|state| {
        let mut x = state.get();
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        state.set(x);
        x
    })
}

/// Generate a random request id (16 hex chars).
pub fn generate_request_id() -> String {
    format!("{:016x}", rand_u64())
}
