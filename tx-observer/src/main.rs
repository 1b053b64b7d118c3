//! Transaction Observer CLI
//!
//! Scans recent blocks for transactions touching subscribed addresses.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tx_observer::{
    config::ObserverConfig, output::create_handler, registry::MemoryRegistry, rpc::RpcClient,
    Observer,
};

#[derive(Parser)]
#[command(name = "tx-observer")]
#[command(about = "Scan recent blocks for transactions touching watched addresses")]
#[command(version)]
struct Cli {
    /// Path to configuration file (built-in defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the trailing block window for every subscribed address
    Scan {
        /// Additional address to subscribe (repeatable)
        #[arg(short, long = "address")]
        addresses: Vec<String>,

        /// Number of trailing blocks to scan (overrides config)
        #[arg(short, long)]
        range: Option<u64>,

        /// JSON-RPC request id (overrides config)
        #[arg(long)]
        request_id: Option<u64>,
    },

    /// Print the current chain height
    Height {
        /// JSON-RPC request id (overrides config)
        #[arg(long)]
        request_id: Option<u64>,
    },

    /// Validate configuration file
    ValidateConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    // Load configuration
    let config = match &cli.config {
        Some(path) => match ObserverConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                if matches!(cli.command, Commands::ValidateConfig) {
                    eprintln!("Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
                anyhow::bail!("Failed to load config from {:?}: {}", path, e);
            }
        },
        None => ObserverConfig::default(),
    };

    match cli.command {
        Commands::Scan {
            addresses,
            range,
            request_id,
        } => run_scan(&config, addresses, range, request_id).await,
        Commands::Height { request_id } => show_height(&config, request_id).await,
        Commands::ValidateConfig => {
            println!("Configuration is valid.");
            println!("  RPC endpoint: {}", config.rpc_endpoint);
            println!("  Addresses: {:?}", config.addresses);
            println!("  Block range: {}", config.block_range);
            println!("  Request timeout: {}s", config.request_timeout_secs);
            println!("  Output format: {:?}", config.output_format);
            Ok(())
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

fn create_observer(config: &ObserverConfig) -> Result<Observer<RpcClient>> {
    let client = RpcClient::with_timeout(&config.rpc_endpoint, config.request_timeout())?;
    Ok(Observer::new(client, Arc::new(MemoryRegistry::new())))
}

async fn run_scan(
    config: &ObserverConfig,
    extra_addresses: Vec<String>,
    range: Option<u64>,
    request_id: Option<u64>,
) -> Result<()> {
    tracing::info!("Starting transaction observer");

    let observer = create_observer(config)?;
    tracing::info!("Observer initialized for {}", config.rpc_endpoint);

    for address in config.addresses.iter().cloned().chain(extra_addresses) {
        observer.subscribe(address);
    }

    let range = range.unwrap_or(config.block_range);
    let request_id = request_id.unwrap_or(config.request_id);

    let reports = observer.scan_subscribed(range, request_id).await?;

    let handler = create_handler(config.output_format);
    handler.handle_batch(&reports).await?;

    println!("Subscribed Addresses:");
    for address in observer.subscribed() {
        println!("{}", address);
    }

    Ok(())
}

async fn show_height(config: &ObserverConfig, request_id: Option<u64>) -> Result<()> {
    let observer = create_observer(config)?;
    let height = observer
        .current_block(request_id.unwrap_or(config.request_id))
        .await?;
    println!("{}", height);
    Ok(())
}
