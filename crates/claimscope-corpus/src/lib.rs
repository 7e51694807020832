//! Claimscope Corpus Layer
//!
//! Loads a directory of analysis artifacts and answers read-only queries over
//! it: filters, search, sort and aggregate statistics.
//!
//! # Architecture
//!
//! - `load_corpus`: one pass over `*.json` files in name order; bad files are
//!   recorded, not fatal
//! - Query functions: pure, over `&[PaperRecord]`, never mutate their input
//! - `CorpusCache`: shares `Arc<Corpus>` snapshots and reloads on an interval
//!
//! # Examples
//!
//! ```no_run
//! use claimscope_corpus::{load_corpus, PaperQuery, SortKey, SortDirection};
//!
//! let corpus = load_corpus("output/analysis_results")?;
//! let query = PaperQuery {
//!     search: Some("thalamus".to_string()),
//!     sort: Some(SortKey::ClaimCount),
//!     direction: SortDirection::Descending,
//!     ..PaperQuery::default()
//! };
//! for record in query.run(&corpus.records) {
//!     println!("{}", record.artifact.paper_metadata.title);
//! }
//! # Ok::<(), claimscope_corpus::CorpusError>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod loader;
mod query;
mod stats;

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub use cache::CorpusCache;
pub use loader::{load_corpus, load_corpus_with, Corpus, PaperRecord, DEFAULT_IGNORED_FILES};
pub use query::{
    filter_by_claim_count, filter_by_model, filter_by_strength, filter_has_insights,
    run_query, search_text, sort_by, PaperQuery, SortDirection, SortKey, StrengthMode,
};
pub use stats::{claim_distribution, compute_statistics, ClaimSupport, CorpusStatistics};

/// Errors that can occur while loading or querying a corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Results directory could not be listed
    #[error("Cannot read results directory {}: {source}", .path.display())]
    Directory {
        /// Directory that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Query parameter could not be understood
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// One artifact file that could not be loaded
///
/// Load errors are collected alongside the records; they never abort a load.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}: {reason}", .path.display())]
pub struct CorpusLoadError {
    /// File that failed
    pub path: PathBuf,
    /// Why it failed
    pub reason: String,
}
