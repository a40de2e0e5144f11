//! Flowbridge CLI - serve remote workflows as MCP tools

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowbridge_core::catalog::FlowCatalog;
use flowbridge_core::client::XingchenClient;
use flowbridge_core::config::load_flows;
use flowbridge_core::mcp::{McpServer, StdioTransport};

#[derive(Parser)]
#[command(name = "flowbridge")]
#[command(about = "Expose remote Xingchen workflows as MCP tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server over stdio
    Serve {
        /// Path to the flow configuration file
        #[arg(short, long, env = "CONFIG_PATH")]
        config: PathBuf,
    },
    /// List configured tools and their input schemas
    List {
        /// Path to the flow configuration file
        #[arg(short, long, env = "CONFIG_PATH")]
        config: PathBuf,
    },
    /// Fetch remote metadata for a configured flow
    Info {
        /// Tool name of the flow
        name: String,
        /// Path to the flow configuration file
        #[arg(short, long, env = "CONFIG_PATH")]
        config: PathBuf,
    },
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let catalog = build_catalog(&config)?;
            tracing::info!("serving {} flows over stdio", catalog.len());
            let server = McpServer::new(Arc::new(catalog), XingchenClient::new());
            server.run(StdioTransport::new()).await?;
        }
        Commands::List { config } => {
            let catalog = build_catalog(&config)?;
            println!("{}", serde_json::to_string_pretty(&catalog.descriptors())?);
        }
        Commands::Info { name, config } => {
            let catalog = build_catalog(&config)?;
            let flow = catalog
                .resolve(&name)
                .with_context(|| format!("no flow named '{name}' in the configuration"))?;
            let info = XingchenClient::new().flow_info(flow).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Version => {
            println!("flowbridge {}", env!("CARGO_PKG_VERSION"));
            println!("flowbridge-core {}", flowbridge_core::VERSION);
        }
    }

    Ok(())
}

fn build_catalog(path: &Path) -> Result<FlowCatalog> {
    let flows = load_flows(path).context("failed to load flow configuration")?;
    FlowCatalog::build(flows).context("failed to build flow catalog")
}
