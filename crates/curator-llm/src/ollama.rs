//! Ollama Provider Implementation
//!
//! Talks to a local Ollama instance through its `/api/chat` endpoint.
//!
//! # Features
//!
//! - Blocking HTTP communication with the Ollama chat API
//! - Configurable endpoint, model and per-call timeout
//! - Non-streaming single-turn exchanges (system + user)
//!
//! Each call is a single attempt. Retrying is the caller's decision; the
//! classifier retries with a fixed delay.
//!
//! # Examples
//!
//! ```no_run
//! use curator_llm::OllamaProvider;
//! use std::time::Duration;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "qwen3:8b", Duration::from_secs(80))?;
//! # Ok::<(), curator_llm::LlmError>(())
//! ```

use crate::LlmError;
use curator_domain::traits::{ChatProvider, ChatRequest, ProviderSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single chat call (80 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 80;

/// Ollama chat API provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    timeout: Duration,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [OllamaMessage<'a>; 2],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_ctx: u32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaResponseMessage>,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama base URL (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "qwen3:8b")
    /// - `timeout`: Upper bound for one chat call
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: normalize_endpoint(&endpoint.into()),
            model: model.into(),
            timeout,
            client: build_client(timeout)?,
        })
    }

    /// Create a provider for the default local endpoint and timeout
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Base endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}

fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client, LlmError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

impl ChatProvider for OllamaProvider {
    type Error = LlmError;

    fn chat(&self, request: &ChatRequest) -> Result<String, Self::Error> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages: [
                OllamaMessage {
                    role: "system",
                    content: &request.system,
                },
                OllamaMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_ctx: request.context_window,
            },
        };

        debug!(model = %self.model, url = %self.chat_url(), "Sending chat request");

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message".to_string()))
    }

    fn reconfigure(&mut self, settings: &ProviderSettings) -> Result<(), Self::Error> {
        if settings.timeout != self.timeout {
            self.client = build_client(settings.timeout)?;
            self.timeout = settings.timeout;
        }
        self.endpoint = normalize_endpoint(&settings.endpoint);
        self.model = settings.model.clone();
        debug!(model = %self.model, endpoint = %self.endpoint, "Provider reconfigured");
        Ok(())
    }
}
