//! webparts - composable HTTP request handling on Tokio and hyper.
//!
//! An application is one [`Part`](part::Part): a unit that receives the
//! request context plus a continuation and either handles the request or
//! declines it. Larger applications are built from small parts with a few
//! combinators, then handed to the [`Server`].
//!
//! # Features
//!
//! - **Combinators**: `compose`/`chain!` for sequencing, `choose`/`choose!` for alternation
//! - **Routing**: method, exact/prefix/regex path, host and scanf-style `path_format`
//! - **Middleware**: cookies, CORS, secure headers, access logging
//! - **Static Files**: traversal-safe file serving with `If-Modified-Since`
//! - **Server**: HTTP/1.1 and HTTP/2, 404 fallback, panic isolation, graceful drain
//!
//! # Example
//!
//! ```rust,ignore
//! use webparts::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> webparts::Result<()> {
//!     let app = choose![
//!         chain![get(), path("/"), plain_text("hello")],
//!         path_format("/add/%d/%d", |(a, b): (i64, i64)| plain_text((a + b).to_string()))?,
//!     ];
//!     webparts::server::listen("127.0.0.1:8080".parse()?, app).await
//! }
//! ```

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod files;
pub mod logging;
pub mod middleware;
pub mod mutation;
pub mod part;
pub mod routing;
pub mod server;
pub mod time;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::{Context, Error, Result};
pub use part::{BoxPart, Next, Part, PartExt, Task};
pub use server::{Server, ServerConfig};

/// Everything needed to assemble an application.
pub mod prelude {
    pub use crate::core::{Body, Context, Cookie, Expiration, Method, SameSite, StreamFactory};
    pub use crate::files::static_files;
    pub use crate::middleware::{
        cors, log_requests, read_cookies, secure_headers, set_cookie, AllowedOrigin, CorsConfig,
        TracingReporter,
    };
    pub use crate::mutation::{
        add_header, html, json, plain_text, respond, set_body, set_body_chunks, set_body_stream,
        set_header, set_header_if_absent, set_mime, set_status, try_set_header,
    };
    pub use crate::part::{
        accept, choose, compose, fail, filter_p, from_fn, map, BoxPart, Next, Part, PartExt, Task,
    };
    pub use crate::routing::{
        delete, get, head, host, method, options, patch, path, path_ci, path_format, path_prefix,
        path_prefix_ci, path_regex, post, put,
    };
    pub use crate::{chain, choose};
    pub use http::StatusCode;
}
