//! HTTP server binary for montage.

use std::path::PathBuf;

use clap::Parser;
use montage::MontageConfig;
use tracing_subscriber::EnvFilter;

/// montage: aggregated image search over Pexels, Pixabay, Unsplash and Wikipedia.
#[derive(Parser)]
#[command(name = "montage-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("montage=info,montage_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = MontageConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        credentials = ?config.credentials,
        "montage-server starting"
    );

    montage::serve(&config).await.map_err(|e| {
        tracing::error!(error = %e, "montage-server exited with error");
        anyhow::anyhow!("montage-server failed: {e}")
    })?;

    tracing::info!("montage-server shut down cleanly");
    Ok(())
}
