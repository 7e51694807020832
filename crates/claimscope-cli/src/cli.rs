//! CLI command definitions and argument parsing.

use crate::error::{CliError, Result};
use claimscope_corpus::{PaperQuery, SortDirection, SortKey, StrengthMode};
use claimscope_domain::{ModelVariant, Strength};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Claimscope - extract claim evidence from papers and browse the results.
#[derive(Debug, Parser)]
#[command(name = "claimscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one paper against the reference claims
    Analyze(AnalyzeArgs),

    /// List analyzed papers
    Papers(PapersArgs),

    /// Show corpus statistics
    Stats(StatsArgs),

    /// Print the reference claim table
    Claims,

    /// Fold the next analysis into the cumulative theory
    Theory(TheoryArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// File holding the article text
    #[arg(short, long)]
    pub article: PathBuf,

    /// Link to the paper
    #[arg(short, long, conflicts_with = "link_file", required_unless_present = "link_file")]
    pub link: Option<String>,

    /// File whose contents are the paper link
    #[arg(long)]
    pub link_file: Option<PathBuf>,

    /// Generation model (defaults to the configured model)
    #[arg(short, long, value_enum)]
    pub model: Option<ModelArg>,

    /// Print a summary of the result
    #[arg(short, long)]
    pub summary: bool,

    /// Directory to write the artifact to (defaults to the results directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Replace the built-in prompt template with the contents of this file
    #[arg(long)]
    pub prompt_template: Option<PathBuf>,

    /// Timeout and retry preset
    #[arg(long, value_enum, default_value = "default")]
    pub preset: PresetArg,
}

/// Arguments for the papers command.
#[derive(Debug, Default, Parser)]
pub struct PapersArgs {
    /// Results directory (defaults to the configured one)
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Allowed evidence strengths, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub strength: Vec<String>,

    /// Apply the strength filter per paper or per evidence entry
    #[arg(long)]
    pub strength_mode: Option<String>,

    /// Minimum number of supported claims
    #[arg(long)]
    pub min_claims: Option<usize>,

    /// Maximum number of supported claims
    #[arg(long)]
    pub max_claims: Option<usize>,

    /// Only papers analyzed with this model
    #[arg(short, long, value_enum)]
    pub model: Option<ModelArg>,

    /// Only papers with additional insights
    #[arg(long)]
    pub has_insights: bool,

    /// Search text, or a claim number
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Sort key: date, claim_count, insight_count or title
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction: asc or desc
    #[arg(long)]
    pub direction: Option<String>,
}

impl PapersArgs {
    /// Build the corpus query these arguments describe
    pub fn to_query(&self) -> Result<PaperQuery> {
        let mut query = PaperQuery {
            strengths: self
                .strength
                .iter()
                .map(|s| s.parse::<Strength>())
                .collect::<std::result::Result<_, _>>()
                .map_err(CliError::InvalidInput)?,
            min_claims: self.min_claims,
            max_claims: self.max_claims,
            model: self.model.map(Into::into),
            has_insights: self.has_insights,
            search: self.search.clone(),
            ..PaperQuery::default()
        };

        if let Some(mode) = &self.strength_mode {
            query.strength_mode = mode.parse::<StrengthMode>()?;
        }
        if let Some(sort) = &self.sort {
            query.sort = Some(sort.parse::<SortKey>()?);
        }
        if let Some(direction) = &self.direction {
            query.direction = direction.parse::<SortDirection>()?;
        }

        query.validate()?;
        Ok(query)
    }
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Results directory (defaults to the configured one)
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Also list support per claim
    #[arg(short, long)]
    pub distribution: bool,

    /// Include unsupported claims in the distribution
    #[arg(long, requires = "distribution")]
    pub all: bool,
}

/// Arguments for the theory command.
#[derive(Debug, Parser)]
pub struct TheoryArgs {
    /// Analysis file to fold in (defaults to the newest not yet incorporated)
    #[arg(short, long)]
    pub analysis: Option<String>,

    /// Generation model (defaults to the configured model)
    #[arg(short, long, value_enum)]
    pub model: Option<ModelArg>,

    /// Print the resulting theory
    #[arg(short, long)]
    pub summary: bool,

    /// Print the current theory without updating it
    #[arg(long, conflicts_with_all = ["analysis", "model"])]
    pub show_current: bool,

    /// Results directory holding the analyses (defaults to the configured one)
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Theory directory (defaults to the configured one)
    #[arg(short, long)]
    pub theory_dir: Option<PathBuf>,

    /// Timeout and retry preset
    #[arg(long, value_enum, default_value = "default")]
    pub preset: PresetArg,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Model selector.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModelArg {
    /// gpt-5
    Standard,
    /// gpt-5-mini
    Mini,
    /// gpt-5-nano
    Nano,
}

/// Extractor timeout and retry preset.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// 300s timeout, 5 attempts
    Default,
    /// Short timeout, few retries
    Aggressive,
    /// Long timeout, many retries
    Lenient,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<ModelArg> for ModelVariant {
    fn from(model: ModelArg) -> Self {
        match model {
            ModelArg::Standard => ModelVariant::Standard,
            ModelArg::Mini => ModelVariant::Mini,
            ModelArg::Nano => ModelVariant::Nano,
        }
    }
}
