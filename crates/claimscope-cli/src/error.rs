//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider could not be set up
    #[error("Provider error: {0}")]
    Provider(#[from] claimscope_llm::LlmError),

    /// Analysis run failed
    #[error(transparent)]
    Extractor(#[from] claimscope_extractor::ExtractorError),

    /// Corpus could not be loaded or queried
    #[error(transparent)]
    Corpus(#[from] claimscope_corpus::CorpusError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
