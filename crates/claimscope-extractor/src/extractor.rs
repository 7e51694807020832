//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{parse_analysis_response, preview};
use crate::prompt::{default_template, estimate_words, PromptBuilder, SYSTEM_PROMPT};
use crate::types::{AnalysisOutcome, AnalysisRequest};
use crate::writer::ArtifactWriter;
use chrono::Local;
use claimscope_domain::traits::{CompletionRequest, LlmProvider, ProviderFailure};
use claimscope_domain::RunMetadata;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// Characters of a rejected response shown at `error` level
const RESPONSE_PREVIEW_CHARS: usize = 500;

/// The Extractor analyses one paper per call and writes one artifact
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    writer: ArtifactWriter,
    template: String,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
{
    /// Create a new Extractor
    ///
    /// Fails with [`ExtractorError::Configuration`] if `config` is invalid.
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Configuration)?;

        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            writer: ArtifactWriter::new(config.output_dir.clone()),
            config,
            template: default_template(),
        })
    }

    /// Use a custom prompt template instead of the generated one
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Analyse one paper and write its artifact
    ///
    /// # Errors
    ///
    /// - `Configuration` / `TextTooLong`: rejected before any provider call
    /// - `RunFailed`: every attempt failed transiently
    /// - `Provider`: a non-transient provider failure, not retried
    /// - `MalformedResponse`: the response broke the artifact schema, not retried
    /// - `Io` / `Serialization`: the artifact could not be written
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, ExtractorError> {
        if request.article_text.trim().is_empty() {
            return Err(ExtractorError::Configuration("article text is empty".to_string()));
        }

        let text_len = request.article_text.chars().count();
        if text_len > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(text_len, self.config.max_text_length));
        }

        let started = Instant::now();

        let prompt = PromptBuilder::new(request.article_text.as_str(), request.link.as_str())
            .with_template(self.template.as_str())
            .build();
        let words = estimate_words(&prompt);

        info!(
            model = %request.model,
            link = %request.link,
            text_chars = text_len,
            prompt_words = words,
            max_attempts = self.config.retry.max_attempts,
            retry_budget_ms = self.config.retry.total_backoff().as_millis() as u64,
            "Starting analysis"
        );

        let completion = CompletionRequest {
            model: request.model,
            system: SYSTEM_PROMPT.to_string(),
            prompt,
            json_response: true,
        };

        let (raw, attempts) = self.complete_with_retry(completion).await?;

        debug!("Response length: {} chars", raw.len());

        let mut artifact = match parse_analysis_response(&raw) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(
                    model = %request.model,
                    attempts,
                    error = %e,
                    preview = %preview(&raw, RESPONSE_PREVIEW_CHARS),
                    "Response failed validation"
                );
                debug!(response = %raw, "Full rejected response");
                return Err(e);
            }
        };

        let now = Local::now();
        artifact.metadata = Some(RunMetadata {
            analysis_timestamp: now.to_rfc3339(),
            model_used: request.model,
            paper_link: request.link.clone(),
            prompt_tokens_estimate: Some(words),
            attempts: Some(attempts),
        });

        let path = self
            .writer
            .write(&artifact, &request.link, now.naive_local())?;

        info!(
            path = %path.display(),
            claims = artifact.claim_count(),
            insights = artifact.insight_count(),
            attempts,
            "Analysis written"
        );

        Ok(AnalysisOutcome {
            artifact,
            path,
            attempts,
            elapsed: started.elapsed(),
        })
    }

    /// Call the provider until it answers, a fatal error occurs or the budget runs out
    pub(crate) async fn complete_with_retry(
        &self,
        request: CompletionRequest,
    ) -> Result<(String, u32), ExtractorError> {
        let policy = &self.config.retry;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, max_attempts = policy.max_attempts, model = %request.model, "Calling provider");

            let result = match timeout(self.config.request_timeout(), self.call_llm(request.clone())).await {
                Ok(result) => result,
                Err(_) => Err(ExtractorError::TransientProvider(format!(
                    "attempt timed out after {}s",
                    self.config.request_timeout_secs
                ))),
            };

            match result {
                Ok(text) => {
                    info!(attempt, model = %request.model, "Provider responded");
                    return Ok((text, attempt));
                }
                Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                    let delay = policy.delay_for(attempt);
                    warn!(
                        attempt,
                        model = %request.model,
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "Transient provider failure, retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    error!(attempt, model = %request.model, error = %e, "Retry budget exhausted");
                    return Err(ExtractorError::RunFailed {
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    error!(attempt, model = %request.model, error = %e, "Provider failed");
                    return Err(e);
                }
            }
        }
    }

    /// Call the LLM provider
    async fn call_llm(&self, request: CompletionRequest) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.complete(&request).map_err(|e| {
                if e.is_transient() {
                    ExtractorError::TransientProvider(e.to_string())
                } else {
                    ExtractorError::Provider(e.to_string())
                }
            })
        })
        .await
        .map_err(|e| ExtractorError::Provider(format!("Task join error: {}", e)))?
    }
}
