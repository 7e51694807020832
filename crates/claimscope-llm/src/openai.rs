//! OpenAI Provider Implementation
//!
//! Talks to the chat-completions endpoint and asks for JSON-object output.
//!
//! # Features
//!
//! - Credential from `OPENAI_API_KEY`, checked before any request is built
//! - Configurable endpoint (for proxies and compatible servers)
//! - Per-request client timeout
//! - HTTP status mapped onto transient / permanent [`LlmError`] variants
//!
//! # Examples
//!
//! ```no_run
//! use claimscope_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env()?;
//! # Ok::<(), claimscope_llm::LlmError>(())
//! ```

use crate::LlmError;
use claimscope_domain::traits::{CompletionRequest, LlmProvider};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default client timeout for one request (5 minutes; long papers are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

impl OpenAiProvider {
    /// Create a provider with an explicit API key
    ///
    /// Fails with [`LlmError::Configuration`] if the key is blank or the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration(format!("{} is empty", API_KEY_VAR)));
        }

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_key(std::env::var(API_KEY_VAR).ok())
    }

    /// Create a provider from a key that may be absent
    ///
    /// `None` and a blank key are both `Configuration` errors.
    pub fn from_key(api_key: Option<String>) -> Result<Self, LlmError> {
        let key = api_key.ok_or_else(|| LlmError::Configuration(format!("{} is not set", API_KEY_VAR)))?;
        Self::new(key)
    }

    /// Use a different API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the client timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one chat completion and return the message content
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded`, `Timeout`, `Server`, `Communication` are transient
    /// - `Authentication`, `ModelNotAvailable`, `Rejected`, `InvalidResponse` are not
    pub async fn chat(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = chat_body(request);

        debug!(model = %request.model, prompt_chars = request.prompt.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, error_text, request.model.model_id()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to decode response: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            info!(model = %request.model, tokens = usage.total_tokens, "received completion");
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("response has no message content".to_string()))
    }
}

impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    /// Blocking wrapper around [`OpenAiProvider::chat`]
    ///
    /// Must be called from a blocking thread (e.g. `spawn_blocking`) when a
    /// Tokio runtime is running; otherwise a private runtime is started.
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.chat(request)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.chat(request)),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

fn chat_body(request: &CompletionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: request.model.model_id(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.prompt,
            },
        ],
        response_format: request.json_response.then_some(ResponseFormat {
            kind: "json_object",
        }),
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

/// Map a non-success HTTP status onto an error variant
fn classify_status(status: StatusCode, body: String, model: &str) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LlmError::Timeout,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Authentication(format!("HTTP {}: {}", status, body))
        }
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        s if s.is_server_error() => LlmError::Server(format!("HTTP {}: {}", status, body)),
        _ => LlmError::Rejected(format!("HTTP {}: {}", status, body)),
    }
}
