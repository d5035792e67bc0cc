//! Curator LLM Provider Layer
//!
//! Implementations of the [`ChatProvider`] trait from `curator-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted, deterministic provider for tests
//! - `OllamaProvider`: Local Ollama chat API integration
//!
//! # Examples
//!
//! ```
//! use curator_llm::MockProvider;
//! use curator_domain::traits::{ChatProvider, ChatRequest, ProviderSettings};
//!
//! let provider = MockProvider::new("运营操作类");
//! let request = ChatRequest {
//!     system: "instructions".to_string(),
//!     user: "summary".to_string(),
//!     temperature: 0.3,
//!     context_window: 5120,
//! };
//! assert_eq!(provider.chat(&request).unwrap(), "运营操作类");
//! assert_eq!(provider.call_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod ollama;

use curator_domain::traits::{ChatProvider, ChatRequest, ProviderSettings};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The endpoint did not answer within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock chat provider for deterministic testing
///
/// Scripted outcomes are consumed in order; once the script is exhausted the
/// fallback outcome is returned for every call. Clones share their script,
/// call counter and request log, so a test can keep a handle after moving the
/// provider into a classifier.
///
/// ```
/// use curator_llm::MockProvider;
/// use curator_domain::traits::{ChatProvider, ChatRequest, ProviderSettings};
///
/// let provider = MockProvider::new("fallback");
/// provider.push_failure("connection refused");
/// provider.push_response("first");
///
/// let request = ChatRequest {
///     system: String::new(),
///     user: String::new(),
///     temperature: 0.0,
///     context_window: 512,
/// };
/// assert!(provider.chat(&request).is_err());
/// assert_eq!(provider.chat(&request).unwrap(), "first");
/// assert_eq!(provider.chat(&request).unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    fallback: Result<String, String>,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    settings: Arc<Mutex<Option<ProviderSettings>>>,
    reconfigure_error: Option<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a provider that answers every call with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            fallback: Ok(response.into()),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            settings: Arc::new(Mutex::new(None)),
            reconfigure_error: None,
        }
    }

    /// Create a provider whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fallback: Err(message.into()),
            ..Self::new("")
        }
    }

    /// Queue a successful answer
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(Ok(response.into()));
    }

    /// Queue a transport failure
    pub fn push_failure(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Make every later `reconfigure` fail with `message`
    pub fn refuse_reconfigure(&mut self, message: impl Into<String>) {
        self.reconfigure_error = Some(message.into());
    }

    /// Settings from the last successful `reconfigure`, if any
    pub fn settings(&self) -> Option<ProviderSettings> {
        lock(&self.settings).clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<ChatRequest> {
        lock(&self.requests).last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ChatProvider for MockProvider {
    type Error = LlmError;

    fn chat(&self, request: &ChatRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        let outcome = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        outcome.map_err(LlmError::Communication)
    }

    fn reconfigure(&mut self, settings: &ProviderSettings) -> Result<(), Self::Error> {
        if let Some(message) = &self.reconfigure_error {
            return Err(LlmError::Other(message.clone()));
        }
        *lock(&self.settings) = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str) -> ChatRequest {
        ChatRequest {
            system: "system".to_string(),
            user: user.to_string(),
            temperature: 0.3,
            context_window: 5120,
        }
    }

    #[test]
    fn test_mock_fixed_response() {
        let provider = MockProvider::new("Fixed response");
        assert_eq!(provider.chat(&request("a")).unwrap(), "Fixed response");
        assert_eq!(provider.chat(&request("b")).unwrap(), "Fixed response");
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_mock_failing() {
        let provider = MockProvider::failing("down");
        match provider.chat(&request("a")) {
            Err(LlmError::Communication(msg)) => assert_eq!(msg, "down"),
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    fn test_mock_clones_share_state() {
        let provider = MockProvider::default();
        let handle = provider.clone();
        provider.chat(&request("hello")).unwrap();
        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.last_request().unwrap().user, "hello");
    }

    #[test]
    fn test_mock_script_then_fallback() {
        let provider = MockProvider::new("later");
        provider.push_response("first");
        provider.push_failure("boom");
        assert_eq!(provider.chat(&request("")).unwrap(), "first");
        assert!(provider.chat(&request("")).is_err());
        assert_eq!(provider.chat(&request("")).unwrap(), "later");
        assert_eq!(provider.requests().len(), 3);
    }
}
