use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::info;

use empleos::cli::{handle_command, Cli};
use empleos::config::ClientConfig;
use empleos::core::ApiClient;
use empleos::session::{FileTokenStore, Session};
use empleos::views::AppContext;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::load()?;
    if let Some(url) = cli.api_url.clone() {
        config.api_base_url = url;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();

    // Config is read before the log file exists, so its origin is reported here.
    info!("Loaded configuration from {}", config.source);
    if cli.api_url.is_some() {
        info!("API URL overridden on the command line");
    }

    let session_path = config.session_path()?;
    info!("API: {}", config.api_base_url);
    info!("Session file: {}", session_path.display());

    let api = ApiClient::new(&config.api_base_url, config.timeout_seconds)?;
    let session = Session::new(Arc::new(FileTokenStore::new(session_path)));
    let ctx = AppContext::new(api, session);

    handle_command(cli.command, &ctx).await
}
