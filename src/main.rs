//! Komodo MCP Server entry point.
//!
//! Loads configuration, initializes logging on stderr, builds the server and
//! runs it over the configured transport.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use komodo_mcp_server::core::config::LoggingConfig;
use komodo_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());

    let config = Config::from_env();
    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone()).context("failed to build tool registry")?;

    TransportService::new(config.transport)
        .run(server)
        .await
        .context("transport stopped with an error")?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Always writes to stderr: stdout carries the protocol in stdio mode.
/// `RUST_LOG` directives are honoured on top of the configured level.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
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
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
