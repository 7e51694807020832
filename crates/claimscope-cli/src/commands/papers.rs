//! Papers command implementation.

use crate::cli::PapersArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use claimscope_corpus::{load_corpus, Corpus};
use std::path::Path;

/// Execute the papers command.
pub fn execute_papers(args: PapersArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let query = args.to_query()?;
    let dir = args.results_dir.as_deref().unwrap_or(&config.results_dir);
    let corpus = load_reporting_errors(dir, formatter)?;

    let papers = query.run(&corpus.records);
    println!("{}", formatter.format_papers(&papers)?);

    Ok(())
}

/// Load `dir`, printing one warning per file that failed to load.
pub(crate) fn load_reporting_errors(dir: &Path, formatter: &Formatter) -> Result<Corpus> {
    let corpus = load_corpus(dir)?;
    for error in &corpus.errors {
        eprintln!("{}", formatter.load_error(error));
    }
    Ok(corpus)
}
