//! HTTP server driving a part pipeline.
//!
//! # Features
//!
//! - **HTTP/1.1 and HTTP/2** - automatic protocol detection via hyper-util
//! - **404 fallback** - requests no route accepts get `404 Not found`
//! - **Fault isolation** - a panicking handler yields `500` for that request only
//! - **Graceful Shutdown** - stop accepting, then drain with a timeout
//!
//! # Example
//!
//! ```rust,ignore
//! use webparts::prelude::*;
//! use webparts::server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> webparts::Result<()> {
//!     let app = chain![get(), path("/"), plain_text("hello")];
//!     let server = Server::new(ServerConfig::new("0.0.0.0:8080".parse()?), app);
//!     server.run().await
//! }
//! ```
//!
//! # Graceful Shutdown
//!
//! ```rust,ignore
//! server.trigger_shutdown();
//! server.wait_for_drain(Duration::from_secs(30)).await;
//! ```

mod adapter;
pub mod config;
mod connection;

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub use adapter::{handle, into_response, not_found, respond, ResponseBody};
pub use config::ServerConfig;
use connection::ConnectionContext;

use crate::core::Result;
use crate::part::{BoxPart, Part, PartExt};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP server for one application part.
pub struct Server {
    config: ServerConfig,
    app: BoxPart,
    /// Active connections counter
    active_connections: Arc<AtomicUsize>,
    /// Source of connection ids
    next_connection_id: AtomicU64,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    shutdown_initiated: AtomicBool,
}

impl Server {
    pub fn new(config: ServerConfig, app: impl Part) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            app: app.boxed(),
            active_connections: Arc::new(AtomicUsize::new(0)),
            next_connection_id: AtomicU64::new(1),
            shutdown_tx,
            shutdown_rx,
            shutdown_initiated: AtomicBool::new(false),
        }
    }

    /// Get current active connections count.
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Get the configured drain timeout.
    pub fn drain_timeout(&self) -> Duration {
        self.config.drain_timeout
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.addr).await?;
        self.serve(listener).await
    }

    /// Accept connections from `listener` until [`trigger_shutdown`] is called.
    ///
    /// Each connection runs on its own task; in-flight connections are not
    /// interrupted when the accept loop stops.
    ///
    /// [`trigger_shutdown`]: Server::trigger_shutdown
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        info!("Server listening on http://{}", local_addr);

        let ctx = Arc::new(ConnectionContext {
            app: self.app.clone(),
            active_connections: Arc::clone(&self.active_connections),
            header_timeout: self.config.header_timeout,
        });
        let mut shutdown_rx = self.shutdown_rx.clone();

        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            tokio::select! {
                result = listener.accept() => {
                    let (stream, remote_addr) = match result {
                        Ok(conn) => conn,
                        Err(e) => {
                            error!("Accept error: {}", e);
                            if let Some(pause) = accept_backoff(&e) {
                                tokio::time::sleep(pause).await;
                            }
                            continue;
                        }
                    };
                    let id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
                    debug!(connection = id, %remote_addr, "accepted");

                    let ctx = Arc::clone(&ctx);
                    tokio::spawn(ctx.handle_connection(stream, id, remote_addr));
                }
                _ = shutdown_rx.changed() => {
                    debug!("Received shutdown signal, stopping accept loop");
                }
            }
        }

        Ok(())
    }

    /// Trigger graceful shutdown.
    /// Stops the accept loop; open connections keep running.
    pub fn trigger_shutdown(&self) {
        if self.shutdown_initiated.swap(true, Ordering::SeqCst) {
            return; // Already initiated
        }
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all active connections to drain.
    /// Returns true if drained successfully, false if timeout was reached.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        let check_interval = Duration::from_millis(100);

        loop {
            let active = self.active_connections.load(Ordering::Relaxed);
            if active == 0 {
                return true;
            }

            if start.elapsed() >= timeout {
                warn!("Drain timeout reached with {} active connections", active);
                return false;
            }

            debug!("Waiting for {} connections to drain...", active);
            tokio::time::sleep(check_interval).await;
        }
    }
}

/// Pause after a failed `accept`.
///
/// Errors tied to one peer are retried at once. Anything else (descriptor
/// exhaustion, out of memory) would fail again immediately, so the loop waits.
fn accept_backoff(err: &io::Error) -> Option<Duration> {
    match err.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::Interrupted => None,
        _ => Some(ACCEPT_BACKOFF),
    }
}

/// Serve `app` on `addr` with default settings.
///
/// Runs until the process exits; returns only if binding the address fails.
/// Accept errors are logged and retried.
pub async fn listen(addr: SocketAddr, app: impl Part) -> Result<()> {
    Server::new(ServerConfig::new(addr), app).run().await
}
