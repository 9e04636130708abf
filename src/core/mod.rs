//! Core types for the request/response pipeline.
//!
//! - [`Context`] - one in-flight request and the response built for it
//! - [`Request`] - inbound request (method, URI, headers, body handle)
//! - [`Body`] - outbound body variants
//! - [`Cookie`] - outbound cookie description and cookie codec
//! - [`Error`] - construction and I/O errors
//!
//! # Example
//!
//! ```rust,ignore
//! use webparts::core::{Context, ConnectionInfo, Request};
//!
//! let ctx = Context::new(ConnectionInfo::new(1, None), request)
//!     .with_status(StatusCode::CREATED)
//!     .with_body("created");
//! ```

mod body;
pub mod cookie;
mod context;
mod error;
mod request;

pub use body::{Body, BodyStream, StreamFactory};
pub use context::{generate_request_id, ConnectionInfo, Context};
pub use cookie::{Cookie, Expiration, SameSite};
pub use error::{Error, Result};
pub use request::{BodyHandle, BoxError, InboundBody, Method, Request};
