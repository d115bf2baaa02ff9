use meilisearch_mcp::client::HttpTransport;
use meilisearch_mcp::config::Config;
use meilisearch_mcp::connection::Connection;
use meilisearch_mcp::logs::{Logger, DEFAULT_NAME};
use meilisearch_mcp::server::MeiliMcpServer;
use meilisearch_mcp::tools::Dispatcher;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rmcp::ServiceExt;
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "meilisearch-mcp",
    version,
    about = "MCP server for Meilisearch administration and search"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Meilisearch base URL (overrides MEILI_HTTP_ADDR)
    #[arg(long)]
    url: Option<String>,

    /// Meilisearch API key (overrides MEILI_MASTER_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Directory for daily log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Only log to the console
    #[arg(long)]
    no_log_file: bool,
}

impl Cli {
    async fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).await?,
            None => Config::default(),
        };
        config.apply_env();
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        if self.no_log_file {
            config.file_logging = false;
        }
        config.resolve_secrets()?;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; console logs go to stderr.
    {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    let cli = Cli::parse();
    let config = cli.resolve_config().await?;

    let logger = if config.file_logging {
        let dir = config.resolved_log_dir();
        Logger::with_log_dir(DEFAULT_NAME, &dir, config.log_buffer)
            .with_context(|| format!("failed to open log directory: {}", dir.display()))?
    } else {
        Logger::console(DEFAULT_NAME)
    };

    let result = serve(&config, logger.clone()).await;
    logger.shutdown();
    result
}

async fn serve(config: &Config, logger: Logger) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::new(config.request_timeout())?);
    let connection = Arc::new(
        Connection::new(config.coordinates(), transport, logger.clone())
            .context("failed to initialise Meilisearch connection")?,
    );
    let dispatcher = Arc::new(Dispatcher::new(connection, logger.clone()));

    logger.info(
        "Starting Meilisearch MCP server",
        json!({ "url": config.url, "log_dir": logger.log_dir() }),
    );

    let service = MeiliMcpServer::new(dispatcher)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP stdio service")?;
    service.waiting().await.context("MCP service failed")?;

    info!("client disconnected, shutting down");
    Ok(())
}
