//! quip-server — serves the demo routes.
//!
//! # Usage
//!
//! ```text
//! quip-server --config quip-server.toml --bind 0.0.0.0:8080
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use quip::Decorator;
use quip_server::{HttpServer, ServerConfig, demo};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "quip-server", about = "Serve quip demo routes over HTTP")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on; overrides the config file.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quip=debug,quip_server=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    info!(bind = %config.server.bind, "quip-server starting");

    let decorator = Decorator::new(config.response);
    let server = HttpServer::new(config.server.bind, decorator, demo::handler());

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c");
            let _ = shutdown_tx.send(true);
        }
    });

    server.serve(shutdown_rx).await?;

    info!("quip-server stopped");
    Ok(())
}
