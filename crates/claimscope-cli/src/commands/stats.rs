//! Stats command implementation.

use super::papers::load_reporting_errors;
use crate::cli::StatsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use claimscope_corpus::{claim_distribution, compute_statistics, ClaimSupport, PaperRecord};

/// Execute the stats command.
pub fn execute_stats(args: StatsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let dir = args.results_dir.as_deref().unwrap_or(&config.results_dir);
    let corpus = load_reporting_errors(dir, formatter)?;

    println!("{}", formatter.format_statistics(&compute_statistics(&corpus.records))?);

    if args.distribution {
        let rows = distribution_rows(&corpus.records, args.all);
        println!("{}", formatter.format_distribution(&rows)?);
    }

    Ok(())
}

/// Per-claim support, most supported first; unsupported claims only with `all`.
pub fn distribution_rows(records: &[PaperRecord], all: bool) -> Vec<ClaimSupport> {
    let mut rows: Vec<ClaimSupport> = claim_distribution(records)
        .into_iter()
        .filter(|row| all || row.count > 0)
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}
