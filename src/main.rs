//! Prompt store MCP server entry point.
//!
//! Loads configuration from the environment, initializes logging on stderr
//! (stdout belongs to the STDIO transport) and serves until the client leaves.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use prompt_store_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!(
        "Starting {} v{} (prompts in {})",
        config.server.name,
        config.server.version,
        config.prompts.storage_dir.display()
    );

    let server = McpServer::new(config.clone());
    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");
    Ok(())
}

fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
