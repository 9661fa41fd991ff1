use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use productive_mcp::client::{ProductiveClient, QueryParams};
use productive_mcp::config::Config;
use productive_mcp::{mcp, sanitize};

#[derive(Parser)]
#[command(name = "productive-mcp")]
#[command(about = "MCP server for the Productive.io API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server via stdio (default)
    Mcp,
    /// Check that the configured credentials reach the Productive API
    Status,
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "productive_mcp=info".into()),
    );

    if use_stderr {
        // MCP mode: log to stderr so stdout is clean for protocol
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env().context("invalid configuration")?;
    sanitize::rules::validate().context("invalid sanitizer rule table")?;
    Ok(config)
}

async fn check_status(config: &Config) -> anyhow::Result<()> {
    println!("Checking Productive API at {}...", config.base_url);

    let client = ProductiveClient::new(config)?;
    let params = QueryParams::new().with("page[size]", 1);
    let result = client.get_projects(&params).await;
    client.close();

    match result {
        Ok(_) => {
            println!("OK: credentials accepted for organization {}", config.organization);
            Ok(())
        }
        Err(e) => anyhow::bail!("Productive API check failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // MCP mode needs stderr for logging since stdout is the protocol channel
    let command = cli.command.unwrap_or(Commands::Mcp);
    init_tracing(matches!(command, Commands::Mcp));

    let config = load_config()?;

    match command {
        Commands::Mcp => mcp::run_stdio_server(&config).await?,
        Commands::Status => check_status(&config).await?,
    }

    Ok(())
}
