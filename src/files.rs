//! Static file serving.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use futures_util::{stream, StreamExt, TryStreamExt};
use http::header::{
    HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, IF_MODIFIED_SINCE, LAST_MODIFIED,
};
use http::{HeaderMap, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::core::{Body, Context, Method, StreamFactory};
use crate::part::{fail, Next, Part, Task};
use crate::time::{http_date, parse_http_date, unix_seconds};

const INDEX_FILE: &str = "index.html";

/// Status and headers computed for a file response.
#[derive(Clone, Debug)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Map a request path onto a file under `root`.
///
/// The path is percent-decoded first. Any `..`, drive prefix or embedded root
/// rejects the request. Paths naming a directory get `index.html` appended.
pub fn resolve_static_file(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_encoding::percent_decode_str(request_path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    let relative = decoded.trim_start_matches('/');

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.is_empty() || relative.ends_with('/') {
        resolved.push(INDEX_FILE);
    }
    Some(resolved)
}

/// Build the response for `path`.
///
/// The file is opened here, so open failures surface as errors before any
/// status is committed. The body streams from that handle; opening the body
/// a second time re-opens the path. A missing path, or a directory, is
/// `ErrorKind::NotFound`.
pub async fn serve_file(path: &Path, request_headers: &HeaderMap) -> io::Result<(ResponseHead, Body)> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "not a regular file"));
    }

    let mut headers = HeaderMap::new();
    let modified = metadata.modified().ok();
    if let Some(value) = modified.and_then(|m| HeaderValue::from_str(&http_date(m)).ok()) {
        headers.insert(LAST_MODIFIED, value);
    }

    if modified.is_some_and(|m| not_modified_since(m, request_headers)) {
        let head = ResponseHead {
            status: StatusCode::NOT_MODIFIED,
            headers,
        };
        return Ok((head, Body::Empty));
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(metadata.len()));

    let head = ResponseHead {
        status: StatusCode::OK,
        headers,
    };
    Ok((head, Body::Stream(file_stream(file, path))))
}

/// `If-Modified-Since` is at or after `modified`, compared in whole seconds.
///
/// Unparseable dates are ignored.
fn not_modified_since(modified: SystemTime, request_headers: &HeaderMap) -> bool {
    request_headers
        .get(IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date)
        .is_some_and(|since| unix_seconds(modified) <= unix_seconds(since))
}

/// Body over an already opened file.
///
/// The first stream takes the handle; later ones open `path` again.
fn file_stream(file: File, path: &Path) -> StreamFactory {
    let opened = Arc::new(Mutex::new(Some(file)));
    let path: Arc<Path> = Arc::from(path);
    StreamFactory::new(move || {
        let taken = opened.lock().ok().and_then(|mut slot| slot.take());
        let path = Arc::clone(&path);
        stream::once(async move {
            match taken {
                Some(file) => Ok(file),
                None => File::open(&*path).await,
            }
        })
        .map_ok(ReaderStream::new)
        .try_flatten()
        .boxed()
    })
}

/// Part produced by [`static_files`].
pub struct StaticFiles {
    root: Arc<Path>,
    prefix: String,
}

/// Serve `GET`/`HEAD` requests under `prefix` from `root`.
///
/// Missing files decline so that a later alternative (or the 404 fallback)
/// can answer. Other I/O failures become a 500 for that request.
pub fn static_files(root: impl Into<PathBuf>, prefix: impl Into<String>) -> StaticFiles {
    let root: PathBuf = root.into();
    StaticFiles {
        root: Arc::from(root),
        prefix: prefix.into(),
    }
}

impl Part for StaticFiles {
    fn call(&self, next: Next, ctx: Context) -> Task {
        let request = ctx.request();
        if !matches!(request.method(), Method::Get | Method::Head) {
            return fail();
        }
        let Some(rest) = request.path().strip_prefix(self.prefix.as_str()) else {
            return fail();
        };
        let Some(file) = resolve_static_file(&self.root, rest) else {
            tracing::debug!(path = request.path(), "rejected static path");
            return fail();
        };

        Box::pin(async move {
            match serve_file(&file, ctx.request().headers()).await {
                Ok((head, body)) => {
                    let mut ctx = ctx.with_status(head.status).with_body(body);
                    for (name, value) in head.headers.iter() {
                        ctx = ctx.with_header(name.clone(), value.clone());
                    }
                    next.run(ctx).await
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(e) => {
                    tracing::error!(path = %file.display(), error = %e, "failed to serve static file");
                    let ctx = ctx
                        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))
                        .with_body("Internal Server Error");
                    next.run(ctx).await
                }
            }
        })
    }
}
