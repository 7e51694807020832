//! Claimscope CLI - analyze papers, browse analysis results and update the cumulative theory.

use claimscope_cli::commands;
use claimscope_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // A missing .env is fine; the key may already be exported
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> claimscope_cli::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter).await?,
        Command::Papers(args) => commands::execute_papers(args, &config, &formatter)?,
        Command::Stats(args) => commands::execute_stats(args, &config, &formatter)?,
        Command::Claims => commands::execute_claims(&formatter)?,
        Command::Theory(args) => commands::execute_theory(args, &config, &formatter).await?,
        Command::Config(command) => commands::execute_config(command, cli.config, &config, &formatter)?,
    }

    Ok(())
}
