//! Built-in middleware, expressed as ordinary parts.
//!
//! Middleware here is nothing more than a part that edits the context and
//! then calls `next` (or, for access logging, calls `next` first and looks
//! at what came back). Ordering is the order of composition:
//!
//! ```text
//! chain![log_requests(r), secure_headers(), cors(cfg), read_cookies(), app]
//!
//! Request → log → secure → cors → cookies → app
//!                                             ↓
//! Some(ctx) ←───────────── log reports ←──────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use webparts::middleware::{cors, read_cookies, secure_headers, CorsConfig};
//!
//! let app = chain![secure_headers(), cors(CorsConfig::default()), read_cookies(), routes];
//! ```

pub mod access_log;
mod cookies;
mod cors;
mod secure_headers;

pub use access_log::{log_requests, AccessEntry, Reporter, TracingReporter};
pub use cookies::{read_cookies, set_cookie};
pub use cors::{cors, AllowedOrigin, CorsConfig};
pub use secure_headers::secure_headers;
