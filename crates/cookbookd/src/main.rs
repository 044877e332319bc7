//! cookbookd — the Cookbook daemon.
//!
//! Owns the process-lifetime recipe store and serves the REST API over it.
//! All data is lost when the process exits.
//!
//! # Usage
//!
//! ```text
//! cookbookd serve --port 3001 --config /etc/cookbook/cookbookd.toml
//! ```

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(name = "cookbookd", about = "Cookbook recipe API daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the recipe API.
    Serve {
        /// Address to bind (overrides the config file).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Path to a cookbookd.toml file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => {
            let config = ServerConfig::load(config.as_deref())?.with_overrides(host, port);
            init_tracing(&config.log_filter);
            serve(config).await
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    info!("Cookbook daemon starting");

    // One store for the whole process; handlers get it through router state.
    let store = cookbook_store::RecipeStore::new();
    let router = cookbook_api::build_router(store);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Cookbook daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server just runs until killed.
            warn!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}
