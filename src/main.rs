//! threat-hunter: live packet capture and traffic classification dashboard

use clap::Parser;
use color_eyre::Result;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use threat_hunter_client::{BackendClient, BackendConfig};
use threat_hunter_tui::App;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// threat-hunter: terminal dashboard for the packet capture backend
#[derive(Parser, Debug)]
#[command(name = "threat-hunter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.threat-hunter/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Packet feed WebSocket URL, overrides the config file
    #[arg(long)]
    feed_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log file path (default: /tmp/threat-hunter.log)
    #[arg(long, default_value = "/tmp/threat-hunter.log")]
    log_file: String,

    /// Redraw interval in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,
}

impl Cli {
    /// Config file (explicit or default) with command-line overrides applied
    fn backend_config(&self) -> Result<BackendConfig> {
        let mut config = match &self.config {
            Some(path) => BackendConfig::load_from(path)?,
            None => BackendConfig::load_default()?,
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(feed_url) = &self.feed_url {
            config.feed_url = Some(feed_url.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    color_eyre::install()?;

    // Log to a file; stdout belongs to the TUI
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let log_file = File::create(&cli.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    tracing::info!("Starting threat-hunter");

    let config = cli.backend_config()?;
    tracing::info!("Backend: {}", config.base_url);

    let client = BackendClient::new(config)?;
    let mut app = App::new(client, Duration::from_millis(cli.tick_ms.max(1)));
    app.run().await?;

    tracing::info!("Goodbye!");
    Ok(())
}
