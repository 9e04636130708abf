//! Per-connection HTTP driver.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use tokio::net::TcpStream;
use tracing::debug;

use super::adapter;
use crate::core::ConnectionInfo;
use crate::part::BoxPart;

/// State shared by every connection of one server.
pub(crate) struct ConnectionContext {
    pub app: BoxPart,
    pub active_connections: Arc<AtomicUsize>,
    pub header_timeout: Option<Duration>,
}

/// Errors that are part of normal client behaviour and not worth logging.
fn is_connection_error(err_str: &str) -> bool {
    err_str.contains("connection reset")
        || err_str.contains("broken pipe")
        || err_str.contains("Connection reset")
        || err_str.contains("os error 104")
        || err_str.contains("os error 32")
        || err_str.contains("timed out")
        || err_str.contains("HeaderTimeout")
}

/// Holds one slot of the active connection count; released on drop, so a
/// panic unwinding through the connection task still frees it.
struct ConnectionGuard(Arc<AtomicUsize>);

impl ConnectionGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(counter))
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

impl ConnectionContext {
    /// Serve every request on `stream` until the peer closes it.
    pub async fn handle_connection(self: Arc<Self>, stream: TcpStream, id: u64, remote_addr: SocketAddr) {
        let _guard = ConnectionGuard::acquire(&self.active_connections);

        let _ = stream.set_nodelay(true);
        let info = ConnectionInfo::new(id, Some(remote_addr));
        let app = self.app.clone();
        let service = service_fn(move |req| adapter::handle(app.clone(), info, req));

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.header_timeout)
            .keep_alive(true);
        builder.http2().timer(TokioTimer::new()).max_concurrent_streams(250);

        if let Err(err) = builder.serve_connection(TokioIo::new(stream), service).await {
            let err_str = format!("{:?}", err);
            if !is_connection_error(&err_str) {
                debug!(connection = id, "Connection error: {:?}", err);
            }
        }
    }
}
