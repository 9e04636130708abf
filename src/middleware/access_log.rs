//! Access logging.
//!
//! The reporter is handed to [`log_requests`] explicitly; there is no global
//! reporter. [`TracingReporter`] emits structured events at INFO level with
//! target "access".

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use http::StatusCode;

use crate::core::{Context, Method};
use crate::part::{Next, Part, Task};

/// One handled request, as seen by a [`Reporter`].
#[derive(Clone, Debug)]
pub struct AccessEntry {
    pub request_id: String,
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub status: StatusCode,
    /// Known body size; `None` for streamed bodies.
    pub bytes: Option<u64>,
    pub duration: Duration,
    pub remote_addr: Option<SocketAddr>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl AccessEntry {
    pub fn from_context(ctx: &Context) -> Self {
        let req = ctx.request();
        Self {
            request_id: ctx.request_id().to_string(),
            method: req.method().clone(),
            path: req.path().to_string(),
            query: req.query().map(str::to_string),
            status: ctx.status(),
            bytes: ctx.body().len_hint(),
            duration: ctx.elapsed(),
            remote_addr: ctx.connection().remote_addr,
            user_agent: req.user_agent().map(str::to_string),
            referer: req.header("referer").map(str::to_string),
        }
    }

    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Sink for access entries.
pub trait Reporter: Send + Sync + 'static {
    fn report(&self, entry: &AccessEntry);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, entry: &AccessEntry) {
        (**self).report(entry)
    }
}

/// Reporter backed by `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, entry: &AccessEntry) {
        tracing::info!(
            target: "access",
            method = %entry.method,
            path = %entry.path,
            query = entry.query.as_deref(),
            status = entry.status.as_u16(),
            bytes = entry.bytes,
            duration_ms = entry.duration_ms(),
            ip = entry.remote_addr.map(|a| a.ip().to_string()).as_deref(),
            ua = entry.user_agent.as_deref(),
            referer = entry.referer.as_deref(),
            request_id = %entry.request_id,
            "{} {} {}",
            entry.method,
            entry.path,
            entry.status.as_u16()
        );
    }
}

/// Part produced by [`log_requests`].
pub struct LogRequests<R> {
    reporter: Arc<R>,
}

/// Report every request the downstream chain handles.
///
/// Declined requests are not reported here; they are reported by whichever
/// enclosing branch finally handles them.
pub fn log_requests<R: Reporter>(reporter: R) -> LogRequests<R> {
    LogRequests {
        reporter: Arc::new(reporter),
    }
}

impl<R: Reporter> Part for LogRequests<R> {
    fn call(&self, next: Next, ctx: Context) -> Task {
        let reporter = Arc::clone(&self.reporter);
        next.run(ctx)
            .map(move |done| {
                if let Some(ref ctx) = done {
                    reporter.report(&AccessEntry::from_context(ctx));
                }
                done
            })
            .boxed()
    }
}
