//! Claimscope CLI library.
//!
//! Runs analyses and renders the artifact corpus in the terminal: argument
//! parsing, user configuration, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
