//! Outbound response body.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::BoxStream;

/// Stream of body chunks produced on demand.
pub type BodyStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Factory producing a fresh body stream.
///
/// Contexts are cloned by `choose`, so the stream itself is not stored; it is
/// created once the response is actually written.
#[derive(Clone)]
pub struct StreamFactory(Arc<dyn Fn() -> BodyStream + Send + Sync>);

impl StreamFactory {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> BodyStream + Send + Sync + 'static,
    {
        Self(Arc::new(factory))
    }

    /// Produce the stream.
    pub fn open(&self) -> BodyStream {
        (self.0)()
    }
}

impl fmt::Debug for StreamFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StreamFactory")
    }
}

/// Response body. Exactly one variant is populated at a time.
#[derive(Clone, Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Single in-memory buffer.
    Buffer(Bytes),
    /// Ordered sequence of buffers written back to back.
    Chunks(Vec<Bytes>),
    /// Lazily produced stream.
    Stream(StreamFactory),
}

impl Body {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Known length in bytes, `None` for streams.
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            Body::Empty => Some(0),
            Body::Buffer(b) => Some(b.len() as u64),
            Body::Chunks(chunks) => Some(chunks.iter().map(|c| c.len() as u64).sum()),
            Body::Stream(_) => None,
        }
    }

    /// Concatenate in-memory variants. Streams yield `None`.
    pub fn to_bytes(&self) -> Option<Bytes> {
        match self {
            Body::Empty => Some(Bytes::new()),
            Body::Buffer(b) => Some(b.clone()),
            Body::Chunks(chunks) => Some(Bytes::from(chunks.concat())),
            Body::Stream(_) => None,
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Buffer(bytes)
    }
}

impl From<Vec<Bytes>> for Body {
    fn from(chunks: Vec<Bytes>) -> Self {
        Body::Chunks(chunks)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Buffer(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Buffer(Bytes::from_static(s.as_bytes()))
    }
}
