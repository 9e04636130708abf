//! Configuration module for webparts.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN_ADDR` | `0.0.0.0:8080` | Server bind address |
//! | `DRAIN_TIMEOUT_SECS` | `30` | Graceful shutdown timeout |
//! | `HEADER_TIMEOUT` | `5s` | Request header read timeout (`off` disables) |
//! | `STATIC_ROOT` | _(empty)_ | Directory served under `/static` |
//! | `ACCESS_LOG` | `0` | Access logging |
//! | `SECURE_HEADERS` | `0` | Security response headers |
//! | `LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `SERVICE_NAME` | `webparts` | Service name in JSON logs |
//!
//! # Example
//!
//! ```rust,ignore
//! use webparts::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! ```

mod error;
mod logging;
mod middleware;
mod parse;
mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use middleware::MiddlewareConfig;
pub use parse::{env_bool, env_duration, env_opt, env_or, env_parse, parse_duration};
pub use server::{ServerConfig, DEFAULT_HEADER_TIMEOUT};

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub middleware: MiddlewareConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            middleware: MiddlewareConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Drain timeout: {}s", self.server.drain_timeout.as_secs());
        match self.server.header_timeout {
            Some(t) => info!("  Header timeout: {}s", t.as_secs()),
            None => info!("  Header timeout: disabled"),
        }

        if let Some(ref root) = self.middleware.static_root {
            info!("  Static root: {}", root.display());
        }
        if self.middleware.access_log {
            info!("  Access log: enabled");
        }
        if self.middleware.secure_headers {
            info!("  Secure headers: enabled");
        }
    }
}
