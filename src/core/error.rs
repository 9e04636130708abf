//! Core error types.

use std::fmt;

/// Errors raised while building parts or driving the server.
///
/// Route misses are never errors: a part that does not apply resolves to
/// `None`. These variants cover construction input and I/O faults.
#[derive(Debug)]
pub enum Error {
    /// Invalid path format string.
    Format(String),

    /// Invalid header name or value.
    InvalidHeader(String),

    /// Invalid regular expression.
    Regex(regex::Error),

    /// I/O error.
    Io(std::io::Error),

    /// Custom error with message.
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(msg) => write!(f, "invalid path format: {}", msg),
            Error::InvalidHeader(msg) => write!(f, "invalid header: {}", msg),
            Error::Regex(e) => write!(f, "invalid regex: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Regex(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::Regex(e)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Custom(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
