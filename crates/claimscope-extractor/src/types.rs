//! Request and outcome types for an analysis run

use claimscope_domain::{AnalysisArtifact, ModelVariant};
use std::path::PathBuf;
use std::time::Duration;

/// Request to analyse one paper
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Full article text
    pub article_text: String,

    /// Link to the paper; recorded in the artifact and used for the file name
    pub link: String,

    /// Model variant to run
    pub model: ModelVariant,
}

/// Result of a successful analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The artifact as written, `_metadata` included
    pub artifact: AnalysisArtifact,

    /// Where the artifact was written
    pub path: PathBuf,

    /// Provider attempts the run needed
    pub attempts: u32,

    /// Wall-clock time from first attempt to written file
    pub elapsed: Duration,
}
