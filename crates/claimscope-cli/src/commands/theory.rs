//! Theory command implementation.

use crate::cli::{PresetArg, TheoryArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use claimscope_domain::traits::LlmProvider;
use claimscope_domain::ModelVariant;
use claimscope_extractor::{ExtractorConfig, TheoryOutcome, TheoryStore, TheoryUpdater};
use claimscope_llm::OpenAiProvider;
use std::path::PathBuf;

/// Resolved settings for one theory update.
#[derive(Debug)]
pub struct TheorySettings {
    /// Extractor settings; `output_dir` is where the analyses are read from
    pub config: ExtractorConfig,
    /// Directory holding the theory
    pub theory_dir: PathBuf,
    /// Generation model
    pub model: ModelVariant,
    /// Specific analysis file to fold in
    pub analysis: Option<String>,
}

/// Execute the theory command.
pub async fn execute_theory(args: TheoryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let settings = resolve(&args, config);

    if args.show_current {
        match TheoryStore::new(&settings.theory_dir).load()? {
            Some(theory) => println!("{}", formatter.format_theory(&theory)?),
            None => println!("{}", formatter.info("No cumulative theory yet")),
        }
        return Ok(());
    }

    let provider = OpenAiProvider::from_env()?.with_timeout(settings.config.request_timeout())?;

    eprintln!(
        "{}",
        formatter.info(&format!("Updating theory with {}...", settings.model))
    );
    match run(provider, settings).await? {
        TheoryOutcome::UpToDate(_) => {
            println!("{}", formatter.info("All analyses are already incorporated"));
        }
        TheoryOutcome::Updated(update) => {
            println!("{}", formatter.format_theory_update(&update)?);
            if args.summary {
                println!("{}", formatter.theory_summary(&update.theory));
            }
        }
    }

    Ok(())
}

/// Resolve directories, model and preset from arguments and configuration.
pub fn resolve(args: &TheoryArgs, config: &Config) -> TheorySettings {
    let mut extractor_config = match args.preset {
        PresetArg::Default => ExtractorConfig::default(),
        PresetArg::Aggressive => ExtractorConfig::aggressive(),
        PresetArg::Lenient => ExtractorConfig::lenient(),
    };
    extractor_config.output_dir = args
        .results_dir
        .clone()
        .unwrap_or_else(|| config.results_dir.clone());

    TheorySettings {
        config: extractor_config,
        theory_dir: args.theory_dir.clone().unwrap_or_else(|| config.theory_dir.clone()),
        model: args.model.map(Into::into).unwrap_or(config.default_model),
        analysis: args.analysis.clone(),
    }
}

/// Run one theory update on `provider`.
pub async fn run<L>(provider: L, settings: TheorySettings) -> Result<TheoryOutcome>
where
    L: LlmProvider + Send + Sync + 'static,
{
    let updater = TheoryUpdater::new(provider, settings.config, settings.theory_dir)?;
    Ok(updater
        .update(settings.model, settings.analysis.as_deref())
        .await?)
}
