//! Language-model completion service used by the relevance analyzer.
//!
//! The analyzer only needs a single stateless completion per call, so the
//! [`LlmClient`] trait is deliberately small. [`openai::OpenAiCompatClient`]
//! talks to any OpenAI-compatible `/v1/chat/completions` endpoint.

pub mod openai;

use async_trait::async_trait;

pub use openai::OpenAiCompatClient;

/// One stateless completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// Completion token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Model returned an empty completion")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the text of a single completion
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}
