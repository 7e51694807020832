//! Claimscope Extractor
//!
//! Analyses one paper against the 50 reference claims with a single
//! text-generation call and persists the result as a JSON artifact.
//!
//! # Architecture
//!
//! ```text
//! Article + link → PromptBuilder → LlmProvider (retry loop) → parser/validation → ArtifactWriter
//! ```
//!
//! [`TheoryUpdater`] reuses the same retry loop to fold written analyses into
//! a cumulative theory, one analysis per update.
//!
//! # Key Features
//!
//! - **Bounded retries**: exponential backoff on rate limits, timeouts and 5xx
//! - **Per-attempt timeout**: one hung call cannot eat the retry budget
//! - **Strict validation**: schema violations fail the run, never retried
//! - **All-or-nothing output**: an artifact file appears only after validation
//!
//! # Example Usage
//!
//! ```no_run
//! use claimscope_extractor::{AnalysisRequest, Extractor, ExtractorConfig};
//! use claimscope_domain::ModelVariant;
//! use claimscope_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiProvider::from_env()?;
//! let extractor = Extractor::new(provider, ExtractorConfig::default())?;
//!
//! let outcome = extractor
//!     .analyze(AnalysisRequest {
//!         article_text: std::fs::read_to_string("prompts/article.txt")?,
//!         link: "https://arxiv.org/abs/2401.01234".to_string(),
//!         model: ModelVariant::Standard,
//!     })
//!     .await?;
//!
//! println!("Wrote {} after {} attempt(s)", outcome.path.display(), outcome.attempts);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod theory;
mod types;
mod writer;


pub use config::{ExtractorConfig, RetryPolicy};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_analysis_response;
pub use prompt::{default_template, PromptBuilder, SYSTEM_PROMPT};
pub use theory::{
    build_theory_prompt, parse_theory_response, select_analysis, AnalysisSummary, ConfidenceLevels,
    CumulativeTheory, SavedTheory, TheoryBody, TheoryChanges, TheoryMetadata, TheoryOutcome, TheoryStore,
    TheoryUpdate, TheoryUpdater, BACKUP_PREFIX, CURRENT_THEORY_FILE, DEFAULT_THEORY_DIR, THEORY_SYSTEM_PROMPT,
};
pub use types::{AnalysisOutcome, AnalysisRequest};
pub use writer::ArtifactWriter;
