//! Storj Node Exporter
//!
//! Connects to every configured storage node dashboard, registers the node,
//! satellite and payout collectors, and serves them for Prometheus to scrape.

use anyhow::{Context, Result};
use clap::Parser;
use node_api::NodeApiClient;
use prometheus::Registry;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use storj_exporter::{Clients, Config, collectors, constants, server};

#[derive(Parser, Debug)]
#[command(name = "storj-exporter", version)]
#[command(about = "Prometheus exporter for Storj storage node dashboards")]
struct Args {
    /// Dashboard base URL, repeatable (replaces STORJ_NODE_<n>_URL discovery)
    #[arg(long = "node-url", value_name = "URL")]
    node_urls: Vec<String>,

    /// Port for the scrape server
    #[arg(short, long, env = constants::PORT_ENV, default_value_t = constants::DEFAULT_PORT)]
    port: u16,

    /// Address for the scrape server
    #[arg(long, default_value = constants::DEFAULT_BIND)]
    bind: IpAddr,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose when set
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::resolve(&args.node_urls, args.bind, args.port, |key| std::env::var(key).ok())?;

    // Clients block on the initial request, so they are built before the
    // async runtime exists
    let clients: Clients = Arc::from(connect_all(&config.node_urls)?);

    let registry = Registry::new();
    collectors::register_all(&registry, &clients).context("Failed to register collectors")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(server::serve(config.listen, registry.clone(), shutdown_signal()))
}

/// Connect to every dashboard; any failure aborts startup
fn connect_all(urls: &[String]) -> Result<Vec<NodeApiClient>> {
    info!(nodes = urls.len(), "Connecting to node dashboards");

    urls.iter()
        .map(|url| {
            let client = NodeApiClient::connect(url)
                .with_context(|| format!("Failed to make initial connection to node {}", url))?;

            info!(
                node_id = client.node_id(),
                url = %url,
                satellites = client.satellites().len(),
                "Connected to node"
            );

            Ok(client)
        })
        .collect()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
