//! Canvas MCP server entry point.
//!
//! Loads configuration from the environment (and `.env`), initializes
//! logging, and serves on the configured transport.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use canvas_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    if config.logging.enabled {
        init_logging(&config.logging.level);
    }

    info!(
        name = %config.server.name,
        version = %config.server.version,
        transport = %config.transport.description(),
        canvas = %config.canvas.base_url,
        cache_enabled = config.cache.enabled,
        "Starting Canvas MCP server"
    );

    let server = McpServer::new(config.clone())?;

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport. `RUST_LOG`
/// directives are honoured on top of the configured level.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
