//! Config command implementation.

use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::{Path, PathBuf};

/// Execute a config subcommand.
///
/// `path` is the `--config` override; without it the default location is used.
pub fn execute_config(
    command: ConfigCommand,
    path: Option<PathBuf>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::path()?,
    };

    match command {
        ConfigCommand::Init { force } => {
            init(&path, force)?;
            println!("{}", formatter.success(&format!("Wrote {}", path.display())));
        }
        ConfigCommand::Show => {
            let contents = toml::to_string_pretty(config)
                .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("# {}\n{}", path.display(), contents);
        }
    }

    Ok(())
}

/// Write a default configuration to `path`.
///
/// An existing file is kept unless `force` is set.
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(path)
}
