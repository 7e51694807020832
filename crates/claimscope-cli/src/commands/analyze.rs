//! Analyze command implementation.

use crate::cli::{AnalyzeArgs, PresetArg};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use claimscope_domain::traits::LlmProvider;
use claimscope_extractor::{AnalysisOutcome, AnalysisRequest, Extractor, ExtractorConfig};
use claimscope_llm::openai::API_KEY_VAR;
use claimscope_llm::OpenAiProvider;
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything an analysis needs, read and checked before any provider call.
#[derive(Debug)]
pub struct PreparedAnalysis {
    /// Extraction input
    pub request: AnalysisRequest,
    /// Extractor settings
    pub config: ExtractorConfig,
    /// Replacement prompt template
    pub template: Option<String>,
}

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    analyze_with_key(args, config, formatter, std::env::var(API_KEY_VAR).ok()).await
}

/// Execute the analyze command with an explicit API key.
///
/// Inputs are read and the key checked before any output directory or
/// provider request exists.
pub async fn analyze_with_key(
    args: AnalyzeArgs,
    config: &Config,
    formatter: &Formatter,
    api_key: Option<String>,
) -> Result<()> {
    let summary = args.summary;
    let prepared = prepare(&args, config)?;

    let provider = OpenAiProvider::from_key(api_key)?.with_timeout(prepared.config.request_timeout())?;

    eprintln!(
        "{}",
        formatter.info(&format!("Starting analysis with {}...", prepared.request.model))
    );
    let outcome = run(provider, prepared).await?;

    println!("{}", formatter.format_analysis(&outcome)?);
    if summary {
        println!("{}", formatter.analysis_summary(&outcome.artifact));
    }

    Ok(())
}

/// Read the article, link and template and resolve settings.
pub fn prepare(args: &AnalyzeArgs, config: &Config) -> Result<PreparedAnalysis> {
    let article_text = read_input("article", &args.article)?;

    let link = match (&args.link, &args.link_file) {
        (Some(link), _) => link.trim().to_string(),
        (None, Some(path)) => read_input("link", path)?.trim().to_string(),
        (None, None) => {
            return Err(CliError::InvalidInput(
                "either --link or --link-file is required".to_string(),
            ))
        }
    };

    let template = args
        .prompt_template
        .as_deref()
        .map(|path| read_input("prompt template", path))
        .transpose()?;

    let mut extractor_config = match args.preset {
        PresetArg::Default => ExtractorConfig::default(),
        PresetArg::Aggressive => ExtractorConfig::aggressive(),
        PresetArg::Lenient => ExtractorConfig::lenient(),
    };
    extractor_config.output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.results_dir.clone());

    let model = args.model.map(Into::into).unwrap_or(config.default_model);

    Ok(PreparedAnalysis {
        request: AnalysisRequest {
            article_text,
            link,
            model,
        },
        config: extractor_config,
        template,
    })
}

/// Run a prepared analysis on `provider`.
pub async fn run<L>(provider: L, prepared: PreparedAnalysis) -> Result<AnalysisOutcome>
where
    L: LlmProvider + Send + Sync + 'static,
{
    let mut extractor = Extractor::new(provider, prepared.config)?;
    if let Some(template) = prepared.template {
        extractor = extractor.with_template(template);
    }

    let outcome = extractor.analyze(prepared.request).await?;
    info!(path = %outcome.path.display(), attempts = outcome.attempts, "Analysis complete");
    Ok(outcome)
}

fn read_input(what: &str, path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CliError::InvalidInput(format!(
            "{} file not found: {}",
            what,
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}
