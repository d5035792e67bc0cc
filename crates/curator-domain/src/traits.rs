//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::time::Duration;

/// A single-turn chat exchange sent to an inference endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System instructions
    pub system: String,

    /// User message (the document summary)
    pub user: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Context window size in tokens
    pub context_window: u32,
}

/// Where and how a provider reaches its model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base URL of the inference service
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Upper bound for one call
    pub timeout: Duration,
}

/// Trait for chat-style inference providers
///
/// Implemented by the infrastructure layer (curator-llm). Calls are blocking
/// and must return only after the endpoint answered or the call failed.
pub trait ChatProvider {
    /// Error type for provider operations
    type Error;

    /// Send one exchange and return the assistant's raw text
    fn chat(&self, request: &ChatRequest) -> Result<String, Self::Error>;

    /// Point subsequent calls at a different endpoint, model or timeout
    ///
    /// On error the provider keeps its previous settings.
    fn reconfigure(&mut self, settings: &ProviderSettings) -> Result<(), Self::Error>;
}
