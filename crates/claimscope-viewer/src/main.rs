//! Claimscope Viewer binary
//!
//! Serves the analysis results browser.

use anyhow::Context;
use clap::Parser;
use claimscope_viewer::{config::ViewerConfig, start_server};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Claimscope Viewer - browse analysis artifacts
#[derive(Parser, Debug)]
#[command(name = "claimscope-viewer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Load configuration from a TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the results directory
    #[arg(short, long)]
    results_dir: Option<PathBuf>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            tracing::warn!("No config file specified, using defaults");
            ViewerConfig::default_test_config()
        }
    };

    if let Some(dir) = args.results_dir {
        config.results_dir = dir;
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }

    start_server(config).await?;

    Ok(())
}
