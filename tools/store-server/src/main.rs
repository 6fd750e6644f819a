//! Store server - serves the Store API over HTTP.
//!
//! Usage:
//! - `store-server` - serve the demo store on 127.0.0.1:8080
//! - `store-server --config store.toml` - load settings from a file
//! - `store-server --print-config` - print a starting config file

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use store_server::config::{generate_default_config, LoggingConfig};
use store_server::{build_app, demo, StoreConfig};

/// Store server - the Store API over HTTP
#[derive(Parser)]
#[command(name = "store-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (TOML, or JSON with a .json extension)
    #[arg(short, long, env = "STORE_CONFIG")]
    config: Option<String>,

    /// Address to listen on, overrides the config file
    #[arg(short, long, env = "STORE_LISTEN")]
    listen: Option<String>,

    /// Log level, overrides the config file
    #[arg(long, env = "STORE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json: bool,

    /// Answer cross-origin requests
    #[arg(long)]
    cors: bool,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut StoreConfig) {
        if let Some(listen) = &self.listen {
            config.server.listen_addr = listen.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json {
            config.logging.json = true;
        }
        if self.cors {
            config.server.enable_cors = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = StoreConfig::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    init_tracing(&config.logging)?;

    let settings = config
        .store
        .settings()
        .context("Invalid [store] configuration")?;
    tracing::info!(
        currency = %settings.currency,
        shipping_enabled = settings.shipping_enabled,
        "store configured"
    );

    let router = Arc::new(demo::store_router(settings));
    let app = build_app(router, config.server.enable_cors);

    let addr = &config.server.listen_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "store server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("store server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level: {}", logging.level))?;

    let result = if logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
