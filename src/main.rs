//! Devig & Kelly — HTTP entry point.
//!
//! Loads configuration, initialises structured logging, and serves the
//! pricing API until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use devig::config::AppConfig;
use devig::server::{self, routes::ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = AppConfig::resolve_path();
    let cfg = AppConfig::load_or_default(&config_path)?;

    info!(
        config = %config_path,
        bind = %cfg.bind_address(),
        default_method = cfg.engine.default_devig_method.as_str(),
        default_kelly_fraction = cfg.engine.default_kelly_fraction,
        origins = ?cfg.server.allowed_origins,
        "Devig service starting up"
    );

    let state = Arc::new(ServerState::from_config(&cfg));
    server::serve(state, &cfg.bind_address()).await?;

    info!("Devig service shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
///
/// `RUST_LOG` overrides the default `devig=info` filter. Setting
/// `DEVIG_LOG_JSON` (any value) switches to JSON lines with thread ids.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("devig=info"));

    let json_logging = std::env::var("DEVIG_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
