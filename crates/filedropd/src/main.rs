//! filedropd - filedrop server daemon
//!
//! Accepts multipart uploads and writes each file into a local directory.
//!
//! Usage:
//!   filedropd [OPTIONS] [config.toml]
//!
//! Without a config file the server listens on 0.0.0.0:8080, accepts the
//! `file` field on `/upload` and writes into `./uploads`.

mod cli;
mod config;

use clap::Parser;
use filedrop_api::{create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Args;
use config::DaemonConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "filedropd=debug,filedrop_api=debug,filedrop_core=debug,tower_http=debug"
    } else {
        "filedropd=info,filedrop_api=info,filedrop_core=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting filedropd");

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            DaemonConfig::load(path)?
        }
        None => DaemonConfig::default(),
    };
    args.apply(&mut config);
    config.upload.validate()?;

    tracing::info!(
        dir = %config.upload.dir.display(),
        field = %config.upload.field,
        routes = ?config.upload.routes().collect::<Vec<_>>(),
        cors = config.upload.cors,
        naming = %config.upload.naming,
        max_body_bytes = ?config.upload.max_body_bytes,
        "Upload endpoint configured"
    );

    let addr = config.server.addr();
    let app = create_router(AppState::new(config.upload));

    // A bind failure ends the process with an error
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
