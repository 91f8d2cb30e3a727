//! Readwise Gateway - Main Entry Point
//!
//! Runs the MCP server on stdin/stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use readwise_gateway::config::GatewayConfig;
use readwise_gateway::notify::ChannelNotifier;
use readwise_gateway::observability::init_default_logging;
use readwise_gateway::protocol::McpServer;
use readwise_gateway::reader::{ReaderApi, ReaderClient};
use readwise_gateway::tools::{builtin, ToolSystem};
use readwise_gateway::transport;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// MCP gateway for a Readwise Reader library
#[derive(Parser)]
#[command(name = "readwise-gateway")]
#[command(about = "Expose a Readwise Reader library to chat clients as MCP tools")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the Reader API base URL
    #[arg(long, value_name = "URL", env = "READWISE_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Print the tool descriptions as JSON
    Tools,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match load_configuration(&cli.config, cli.base_url) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => run_server(config).await,
        Commands::Config { show } => handle_config_command(config, show),
        Commands::Tools => handle_tools_command(),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
    base_url: Option<String>,
) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            GatewayConfig::load_from_file(path)?
        }
        None => {
            let default_paths = ["readwise-gateway.toml", "config/readwise-gateway.toml"];

            match default_paths
                .iter()
                .map(PathBuf::from)
                .find(|path| path.exists())
            {
                Some(path) => {
                    info!("Loading configuration from: {}", path.display());
                    GatewayConfig::load_from_file(&path)?
                }
                None => GatewayConfig::default(),
            }
        }
    };

    if let Some(base_url) = base_url {
        config.reader.base_url = base_url;
        config.validate()?;
    }

    Ok(config)
}

async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Fail fast: no credential, no server.
    let credentials = config.credentials()?;

    info!(
        server = %config.server.name,
        version = %config.server.version,
        base_url = %credentials.base_url,
        "Starting Readwise gateway"
    );

    let reader: Arc<dyn ReaderApi> = Arc::new(ReaderClient::new(credentials)?);

    let (outbound, outbound_rx) = transport::outbound_channel();
    let notifier = Arc::new(ChannelNotifier::new(outbound.clone()));
    let tools = ToolSystem::reader(reader, notifier);
    let server = Arc::new(McpServer::new(config.server.clone(), tools));

    let session = transport::serve(
        tokio::io::stdin(),
        tokio::io::stdout(),
        server,
        outbound,
        outbound_rx,
    );

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = session => {
            result?;
            info!("Client closed the session");
        }
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    Ok(())
}

fn handle_config_command(
    config: GatewayConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{}", toml::to_string_pretty(&config)?);
    }

    config.credentials()?;
    info!(
        "Configuration valid; credential found in {}",
        config.reader.api_key_env
    );
    Ok(())
}

fn handle_tools_command() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&builtin::descriptions())?);
    Ok(())
}
