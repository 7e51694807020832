//! Claimscope LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `claimscope-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted, deterministic provider for tests
//! - `OpenAiProvider`: Chat-completions API with JSON output mode
//!
//! Providers make exactly one request per call. Retrying is the caller's
//! decision, driven by [`ProviderFailure::is_transient`].
//!
//! # Examples
//!
//! ```
//! use claimscope_llm::{LlmError, MockProvider};
//! use claimscope_domain::traits::{CompletionRequest, LlmProvider, ProviderFailure};
//! use claimscope_domain::ModelVariant;
//!
//! let provider = MockProvider::new("{}");
//! provider.push_error(LlmError::RateLimitExceeded);
//!
//! let request = CompletionRequest {
//!     model: ModelVariant::Nano,
//!     system: String::new(),
//!     prompt: "test".into(),
//!     json_response: true,
//! };
//! assert!(provider.complete(&request).unwrap_err().is_transient());
//! assert_eq!(provider.complete(&request).unwrap(), "{}");
//! ```

#![warn(missing_docs)]

pub mod openai;

use claimscope_domain::traits::{CompletionRequest, LlmProvider, ProviderFailure};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or connection failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider returned a 5xx status
    #[error("Server error: {0}")]
    Server(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credential missing or refused
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider refused the request as malformed
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider misconfigured locally
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl ProviderFailure for LlmError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_)
                | LlmError::Server(_)
                | LlmError::Timeout
                | LlmError::RateLimitExceeded
        )
    }
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Respond(String),
    Fail(LlmError),
}

/// Mock LLM provider for deterministic testing
///
/// Scripted outcomes are consumed in order, one per call; once the script is
/// empty every call returns the default response. Clones share the script,
/// the call count and the request log.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<MockOutcome>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    latency: Option<Duration>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Sleep this long inside every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a response for the next unscripted call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(MockOutcome::Respond(response.into()));
    }

    /// Queue an error for the next unscripted call
    pub fn push_error(&self, error: LlmError) {
        lock(&self.script).push_back(MockOutcome::Fail(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    /// Reset the call log
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        match lock(&self.script).pop_front() {
            Some(MockOutcome::Respond(text)) => Ok(text),
            Some(MockOutcome::Fail(error)) => Err(error),
            None => Ok(self.default_response.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscope_domain::ModelVariant;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: ModelVariant::Standard,
            system: "system".to_string(),
            prompt: prompt.to_string(),
            json_response: true,
        }
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any prompt"));
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_script_order() {
        let provider = MockProvider::default();
        provider.push_error(LlmError::Timeout);
        provider.push_response("second");

        assert_eq!(provider.complete(&request("a")), Err(LlmError::Timeout));
        assert_eq!(provider.complete(&request("b")).unwrap(), "second");
        assert_eq!(
            provider.complete(&request("c")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("prompt1")).unwrap();
        provider.complete(&request("prompt2")).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].prompt, "prompt2");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider2.push_error(LlmError::RateLimitExceeded);
        assert!(provider1.complete(&request("x")).is_err());

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(LlmError::Timeout.is_transient());
        assert!(LlmError::Server("502".into()).is_transient());
        assert!(LlmError::Communication("reset".into()).is_transient());

        assert!(!LlmError::Authentication("401".into()).is_transient());
        assert!(!LlmError::ModelNotAvailable("gpt-5".into()).is_transient());
        assert!(!LlmError::Rejected("400".into()).is_transient());
        assert!(!LlmError::InvalidResponse("no choices".into()).is_transient());
        assert!(!LlmError::Configuration("no key".into()).is_transient());
    }
}
