//! Configuration error types.

use std::fmt;

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse environment variable.
    Parse {
        key: String,
        value: String,
        error: String,
    },
    /// Parsed, but not acceptable.
    Invalid { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { key, value, error } => {
                write!(f, "failed to parse {}='{}': {}", key, value, error)
            }
            ConfigError::Invalid { key, message } => {
                write!(f, "invalid value for {}: {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigError::Parse {
            key: "LISTEN_ADDR".into(),
            value: "nope".into(),
            error: "invalid socket address syntax".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse LISTEN_ADDR='nope': invalid socket address syntax"
        );

        let err = ConfigError::Invalid {
            key: "LOG_FORMAT".into(),
            message: "expected text or json".into(),
        };
        assert_eq!(err.to_string(), "invalid value for LOG_FORMAT: expected text or json");
    }
}
