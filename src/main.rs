//! Gemini chat proxy.
//!
//! Serves a static front-end and forwards `POST /api/chat` to the Gemini
//! API with the server's key attached.
//!
//! ```text
//!     Browser                ┌──────────────────────────────────────────┐
//!     ───────────────────────┼─▶ axum Router                            │
//!       GET /, /app.js ...   │     ├─ ServeDir(static root)             │
//!       POST /api/chat       │     └─ ProxyHandler ── + ?key=... ───────┼──▶ Gemini API
//!     ◀──────────────────────┼───────── status + JSON body, unchanged ◀─┼───
//!                            └──────────────────────────────────────────┘
//! ```
//!
//! # Environment variables
//!
//! | Variable            | Default            | Description                       |
//! |---------------------|--------------------|-----------------------------------|
//! | `GEMINI_API_KEY`    | (none)             | Upstream API key                  |
//! | `PORT`              | `3000`             | TCP port to listen on             |
//! | `GEMINI_MODEL`      | `gemini-2.5-flash` | Model identifier                  |
//! | `GEMINI_BASE_URL`   | Google endpoint    | Override upstream base URL        |
//! | `STATIC_ROOT`       | `public`           | Directory served for other paths  |
//! | `CHAT_PROXY_CONFIG` | (none)             | Optional TOML config file         |
//! | `RUST_LOG`          | `chat_proxy=info`  | Log filter (tracing-subscriber)   |

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use chat_proxy::config::{load_from_env, loader::ENV_CONFIG_PATH};
use chat_proxy::lifecycle::{shutdown, signals, Shutdown};
use chat_proxy::observability::{logging, metrics};
use chat_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "chat-proxy")]
#[command(about = "Static front-end server with a key-injecting Gemini proxy", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = ENV_CONFIG_PATH)]
    config: Option<PathBuf>,

    /// Listen port (overrides config file and PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_from_env(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("chat-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        model = %config.upstream.model,
        static_root = %config.static_files.root,
        api_key_configured = config.upstream.api_key.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server listening");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server
        .run(listener, shutdown::wait_for(shutdown.subscribe()))
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
