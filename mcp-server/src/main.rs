//! Evently MCP Server
//!
//! Exposes the event planning core as MCP tools over stdio:
//! - Resolving event attributes from planning selections
//! - Tallying date poll votes
//! - Creating events and running their date polls
//!
//! State is held in memory for the lifetime of the process.

mod server;

use anyhow::Result;
use evently_planner::config::Config;
use rmcp::ServiceExt;
use server::EventPlannerServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize logging to stderr (stdout is used for MCP protocol)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        poll_min_options = config.poll_min_options,
        poll_max_options = config.poll_max_options,
        "Starting Evently MCP server"
    );

    let server = EventPlannerServer::new(&config);

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    // Wait for shutdown
    service.waiting().await?;

    Ok(())
}
