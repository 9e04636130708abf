//! Middleware configuration.

use std::path::PathBuf;

use super::parse::{env_bool, env_opt};
use super::ConfigError;

/// Which built-in parts the binary wraps around its routes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MiddlewareConfig {
    /// Access logging enabled.
    pub access_log: bool,
    /// Add the standard security headers to every response.
    pub secure_headers: bool,
    /// Serve files from this directory under `/static`.
    pub static_root: Option<PathBuf>,
}

impl MiddlewareConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let static_root = env_opt("STATIC_ROOT").map(PathBuf::from);
        if let Some(ref root) = static_root {
            if !root.is_dir() {
                return Err(ConfigError::Invalid {
                    key: "STATIC_ROOT".into(),
                    message: format!("{} is not a directory", root.display()),
                });
            }
        }

        Ok(Self {
            access_log: env_bool("ACCESS_LOG", false),
            secure_headers: env_bool("SECURE_HEADERS", false),
            static_root,
        })
    }
}
