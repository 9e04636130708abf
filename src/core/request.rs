//! Inbound HTTP request carried by every context.

use std::fmt;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Uri};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty};

use super::error::{Error, Result};

/// Boxed error type used by inbound bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type-erased inbound body stream.
pub type InboundBody = UnsyncBoxBody<Bytes, BoxError>;

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static CONTENT_TYPE: HeaderName = header::CONTENT_TYPE;
    pub static CONTENT_LENGTH: HeaderName = header::CONTENT_LENGTH;
    pub static HOST: HeaderName = header::HOST;
    pub static USER_AGENT: HeaderName = header::USER_AGENT;
}

/// HTTP request method.
///
/// Closed set of the registered methods plus an escape hatch for extensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
    /// Any extension method, kept verbatim.
    Other(String),
}

impl Method {
    /// Canonical upper-case name.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
            Method::Other(name) => name,
        }
    }
}

impl From<&http::Method> for Method {
    fn from(method: &http::Method) -> Self {
        match *method {
            http::Method::GET => Method::Get,
            http::Method::HEAD => Method::Head,
            http::Method::POST => Method::Post,
            http::Method::PUT => Method::Put,
            http::Method::DELETE => Method::Delete,
            http::Method::CONNECT => Method::Connect,
            http::Method::OPTIONS => Method::Options,
            http::Method::TRACE => Method::Trace,
            http::Method::PATCH => Method::Patch,
            _ => Method::Other(method.as_str().to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Take-once handle to the inbound request body.
///
/// Contexts are cloned when `choose` tries alternatives, so the body lives
/// behind a shared slot; whichever part reads it first takes it.
#[derive(Clone, Default)]
pub struct BodyHandle {
    slot: Arc<Mutex<Option<InboundBody>>>,
}

impl BodyHandle {
    /// Wrap an inbound body.
    pub fn new(body: InboundBody) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(body))),
        }
    }

    /// A handle with a zero-length body.
    pub fn empty() -> Self {
        Self::new(Empty::<Bytes>::new().map_err(|never| match never {}).boxed_unsync())
    }

    /// Take the body out of the handle. Returns `None` once taken.
    pub fn take(&self) -> Option<InboundBody> {
        match self.slot.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    /// Read the whole body into memory.
    pub async fn read_to_bytes(&self) -> Result<Bytes> {
        let body = self
            .take()
            .ok_or_else(|| Error::Custom("request body already consumed".to_string()))?;
        let collected = body
            .collect()
            .await
            .map_err(|e| Error::Custom(format!("failed to read request body: {}", e)))?;
        Ok(collected.to_bytes())
    }
}

impl fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyHandle")
    }
}

/// HTTP request as seen by parts.
///
/// Note: Clone is intentionally not derived; contexts share it behind an `Arc`.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: BodyHandle,
    version: http::Version,
}

impl Request {
    /// Create a new request.
    #[inline]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: BodyHandle) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            version: http::Version::HTTP_11,
        }
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request path.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get the query string.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the body handle.
    #[inline]
    pub fn body(&self) -> &BodyHandle {
        &self.body
    }

    /// Get the HTTP version.
    #[inline]
    pub fn version(&self) -> http::Version {
        self.version
    }

    /// Get a header value by name (fast path with HeaderName constant).
    #[inline]
    fn header_by_name(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the request host.
    ///
    /// The `Host` header, or for HTTP/2 the `:authority` pseudo-header,
    /// which hyper places in the URI.
    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.header_by_name(&header_names::HOST)
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
    }

    /// Get Content-Type header.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header_by_name(&header_names::CONTENT_TYPE)
    }

    /// Get Content-Length header.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        self.header_by_name(&header_names::CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
    }

    /// Get User-Agent header.
    #[inline]
    pub fn user_agent(&self) -> Option<&str> {
        self.header_by_name(&header_names::USER_AGENT)
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: Method::from(&parts.method),
            uri: parts.uri,
            headers: parts.headers,
            body: BodyHandle::new(body.map_err(Into::into).boxed_unsync()),
            version: parts.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn http_request(method: &str, uri: &str) -> http::request::Builder {
        http::Request::builder().method(method).uri(uri)
    }

    #[test]
    fn test_request_from_http() {
        let http_req = http_request("GET", "/test?foo=bar")
            .header("host", "example.com")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let req = Request::from(http_req);

        assert_eq!(req.method(), &Method::Get);
        assert_eq!(req.path(), "/test");
        assert_eq!(req.query(), Some("foo=bar"));
        assert_eq!(req.host(), Some("example.com"));
    }

    #[test]
    fn test_host_falls_back_to_authority() {
        let h2_req = http::Request::builder()
            .method("GET")
            .uri("https://example.com/")
            .version(http::Version::HTTP_2)
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert_eq!(Request::from(h2_req).host(), Some("example.com"));

        let both = http_request("GET", "http://authority.test/")
            .header("host", "header.test")
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert_eq!(Request::from(both).host(), Some("header.test"));

        let neither = http_request("GET", "/").body(Full::new(Bytes::new())).unwrap();
        assert_eq!(Request::from(neither).host(), None);
    }

    #[test]
    fn test_request_headers() {
        let http_req = http_request("POST", "/api")
            .header("content-type", "application/json")
            .header("content-length", "42")
            .header("user-agent", "test/1.0")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let req = Request::from(http_req);

        assert_eq!(req.content_type(), Some("application/json"));
        assert_eq!(req.content_length(), Some(42));
        assert_eq!(req.user_agent(), Some("test/1.0"));
        assert_eq!(req.header("User-Agent"), Some("test/1.0"));
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(Method::from(&http::Method::OPTIONS), Method::Options);
        assert_eq!(Method::from(&http::Method::PATCH), Method::Patch);

        let custom = http::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(Method::from(&custom), Method::Other("PURGE".to_string()));
        assert_eq!(Method::Other("PURGE".to_string()).as_str(), "PURGE");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[tokio::test]
    async fn test_body_is_taken_once() {
        let http_req = http_request("POST", "/upload")
            .body(Full::new(Bytes::from_static(b"payload")))
            .unwrap();
        let req = Request::from(http_req);

        let body = req.body().read_to_bytes().await.unwrap();
        assert_eq!(body.as_ref(), b"payload");

        assert!(req.body().read_to_bytes().await.is_err());
        assert!(req.body().take().is_none());
    }

    #[tokio::test]
    async fn test_empty_body_handle() {
        let handle = BodyHandle::empty();
        let bytes = handle.read_to_bytes().await.unwrap();
        assert!(bytes.is_empty());
    }
}
