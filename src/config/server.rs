//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use super::parse::{env_duration, env_parse};
use super::ConfigError;

/// Header read timeout used when `HEADER_TIMEOUT` is unset.
pub const DEFAULT_HEADER_TIMEOUT: Duration = Duration::from_secs(5);

/// Server configuration loaded from environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8080).
    pub listen_addr: SocketAddr,
    /// Graceful shutdown drain timeout.
    pub drain_timeout: Duration,
    /// Time allowed for a client to send request headers; `None` disables it.
    pub header_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            drain_timeout: Duration::from_secs(30),
            header_timeout: Some(DEFAULT_HEADER_TIMEOUT),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let drain_timeout_secs: u64 =
            env_parse("DRAIN_TIMEOUT_SECS", defaults.drain_timeout.as_secs())?;

        Ok(Self {
            listen_addr: env_parse("LISTEN_ADDR", defaults.listen_addr)?,
            drain_timeout: Duration::from_secs(drain_timeout_secs),
            header_timeout: env_duration("HEADER_TIMEOUT", "5s")?,
        })
    }
}
