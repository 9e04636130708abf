//! Server runtime configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use webparts::server::ServerConfig;
//!
//! let config = ServerConfig::new("0.0.0.0:8080".parse().unwrap())
//!     .with_drain_timeout(Duration::from_secs(10))
//!     .with_header_timeout(None);
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use crate::config;

/// Server configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Graceful shutdown drain timeout.
    pub drain_timeout: Duration,
    /// Header read timeout for HTTP/1 connections; `None` disables it.
    pub header_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            drain_timeout: Duration::from_secs(30),
            header_timeout: Some(config::DEFAULT_HEADER_TIMEOUT),
        }
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_header_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.header_timeout = timeout;
        self
    }
}

impl From<&config::ServerConfig> for ServerConfig {
    fn from(cfg: &config::ServerConfig) -> Self {
        Self {
            addr: cfg.listen_addr,
            drain_timeout: cfg.drain_timeout,
            header_timeout: cfg.header_timeout,
        }
    }
}
