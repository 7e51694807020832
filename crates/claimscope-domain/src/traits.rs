//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction logic and the
//! text-generation service. Implementations live in `claimscope-llm`.

use crate::model::ModelVariant;

/// A single completion request sent to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Model to run
    pub model: ModelVariant,
    /// System instruction
    pub system: String,
    /// User prompt (template, article text and link)
    pub prompt: String,
    /// Ask the provider to constrain output to a JSON object
    pub json_response: bool,
}

/// Classification of provider failures for retry decisions
pub trait ProviderFailure {
    /// Whether retrying the same request may succeed
    ///
    /// Rate limits, timeouts, server errors and dropped connections are
    /// transient; authentication or request-shape problems are not.
    fn is_transient(&self) -> bool;
}

/// Trait for text-generation providers
///
/// Implemented by the infrastructure layer (claimscope-llm). Calls are
/// blocking; async callers run them on a blocking thread.
pub trait LlmProvider {
    /// Error type for provider operations
    type Error: ProviderFailure + std::fmt::Display;

    /// Run one completion and return the raw response text
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Provider name for logs
    fn name(&self) -> &str {
        "llm"
    }
}
