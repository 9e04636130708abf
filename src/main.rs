use std::time::Duration;

use tracing::{error, info};

use webparts::config::{Config, MiddlewareConfig};
use webparts::prelude::*;
use webparts::server::{Server, ServerConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let config = Config::from_env()?;
    webparts::logging::init(&config.logging);

    info!("Starting webparts {}...", webparts::VERSION);
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), BoxError> {
    let app = build_app(&config.middleware)?;
    let server = Server::new(ServerConfig::from(&config.server), app);

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    server.trigger_shutdown();
    if !server.wait_for_drain(server.drain_timeout()).await {
        info!("Exiting with {} connections still open", server.active_connections());
    }

    Ok(())
}

/// Demo application: a few routes plus the middleware enabled in `config`.
fn build_app(config: &MiddlewareConfig) -> webparts::Result<BoxPart> {
    let api = chain![
        path_prefix("/api"),
        cors(CorsConfig::new().max_age(600)),
        choose![
            chain![get(), path("/api/status"), json(&serde_json::json!({
                "service": "webparts",
                "version": webparts::VERSION,
            }))],
            chain![
                get(),
                path_format("/api/add/%d/%d", |(a, b): (i64, i64)| {
                    json(&serde_json::json!({ "a": a, "b": b, "sum": a.saturating_add(b) }))
                })?,
            ],
        ],
    ];

    let pages = choose![
        chain![get(), path("/"), plain_text("Hello from webparts\n")],
        chain![
            get(),
            path_format("/hello/%s", |name: String| plain_text(format!("Hello, {}!\n", name)))?,
        ],
        chain![get(), path("/visits"), read_cookies(), visits()],
    ];

    let mut routes = vec![api.boxed(), pages.boxed()];
    if let Some(root) = &config.static_root {
        routes.push(static_files(root.clone(), "/static").boxed());
    }

    let mut app = choose(routes).boxed();
    if config.secure_headers {
        app = compose(secure_headers(), app).boxed();
    }
    if config.access_log {
        app = compose(log_requests(TracingReporter), app).boxed();
    }
    Ok(app)
}

/// Count visits in a cookie.
fn visits() -> impl Part {
    from_fn(|next: Next, ctx: Context| -> Task {
        let count = ctx
            .cookie("visits")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let cookie = Cookie::new("visits", count.to_string())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .expires(Expiration::MaxAge(Duration::from_secs(86_400)));
        chain![set_cookie(cookie), plain_text(format!("Visit #{}\n", count))].call(next, ctx)
    })
}
