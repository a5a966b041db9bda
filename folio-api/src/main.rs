//! folio-api - HTTP API for the portfolio site
//!
//! Loads configuration, opens the submission database and serves the API.

use anyhow::{Context, Result};
use clap::Parser;
use folio_api::{build_router, AppState};
use folio_common::db::init_database;
use folio_common::Config;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments; each overrides the config file and environment
#[derive(Debug, Parser)]
#[command(name = "folio-api", version, about = "HTTP API for the portfolio site")]
struct Args {
    /// Path to a TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5780
    #[arg(long)]
    bind: Option<String>,

    /// Datastore connection string
    #[arg(long)]
    database_url: Option<String>,

    /// Directory holding projects/ and current-focus.json
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(url) = self.database_url {
            config.database_url = url;
        }
        if let Some(dir) = self.content_dir {
            config.content_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting folio-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut args = Args::parse();
    let config_path = args.config.take();
    let mut config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate()?;
    config.log_summary();

    let pool = match init_database(&config.database_url).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::from_config(pool, &config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("folio-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("folio-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
