//! liftsheet server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use liftsheet_core::config::AppConfig;
use liftsheet_server::bootstrap::ensure_tables;
use liftsheet_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// liftsheet - a workout tracker backed by a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "liftsheetd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "LIFTSHEET_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Merge the optional config file with `LIFTSHEET_` environment variables.
fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();
    if std::path::Path::new(path).exists() {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::info!("No config file found at {path}, using defaults and environment");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("LIFTSHEET_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("liftsheet v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    liftsheet_server::metrics::register_metrics();

    let store = liftsheet_storage::from_config(&config.store)
        .await
        .context("failed to initialize backing store")?;
    tracing::info!(backend = store.backend_name(), "Backing store initialized");

    let state = AppState::new(config.clone(), store);
    ensure_tables(&state).await?;

    if config.cache.enabled {
        let _cleanup = liftsheet_tables::spawn_cleanup_task(
            state.tables.cache().clone(),
            config.cache.cleanup_interval(),
        );
        tracing::info!(
            ttl_secs = config.cache.ttl_secs,
            interval_secs = config.cache.cleanup_interval_secs,
            "Cache cleanup task spawned"
        );
    } else {
        tracing::info!("Table cache disabled");
    }

    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
