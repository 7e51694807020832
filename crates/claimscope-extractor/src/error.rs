//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during an analysis run
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Missing credential, missing input or invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Article exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// One provider attempt failed in a way worth retrying
    #[error("Transient provider error: {0}")]
    TransientProvider(String),

    /// Provider failed in a way retrying cannot fix
    #[error("Provider error: {0}")]
    Provider(String),

    /// Retry budget exhausted
    #[error("Run failed after {attempts} attempt(s): {reason}")]
    RunFailed {
        /// Attempts made
        attempts: u32,
        /// Last transient failure
        reason: String,
    },

    /// Response does not conform to the artifact schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Stored cumulative theory could not be read back
    #[error("Invalid theory file: {0}")]
    InvalidTheory(String),

    /// Analysis directory could not be read
    #[error(transparent)]
    Corpus(#[from] claimscope_corpus::CorpusError),

    /// Artifact could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractorError {
    /// Whether the retry loop should try again after this error
    pub fn is_transient(&self) -> bool {
        matches!(self, ExtractorError::TransientProvider(_))
    }
}
