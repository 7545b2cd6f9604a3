//! LLM backend abstraction shared across the analysis pipeline.
//!
//! Wraps Ollama and OpenAI-compatible HTTP APIs behind two small capability
//! traits, [`LLMProvider`] and [`EmbeddingProvider`], so callers depend on a
//! contract rather than a concrete backend. [`profiles::LlmServiceProfiles`]
//! implements both on top of its cached fast/slow/embedding clients.

pub mod config;
pub mod error;
pub mod health;
pub mod noop;
pub mod profiles;
pub mod providers;
pub mod telemetry;

use async_trait::async_trait;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error::LlmError;
pub use health::{HealthService, HealthStatus};
pub use noop::{NoopEmbeddingProvider, NoopLLMProvider};
pub use profiles::LlmServiceProfiles;

/// Capability for free-form text generation, independent of the backend.
///
/// Implemented by [`profiles::LlmServiceProfiles`] (routes to the `slow`
/// profile — the higher-quality model, used for smell review prose) and
/// usable by callers that only need "ask the model a question", such as
/// vulnerability-scanning's LLM-assisted pass.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends `prompt` (with optional `system` instruction) and returns the
    /// model's response text.
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;
}

/// Capability for turning text into a fixed-size embedding vector.
///
/// Implemented by [`profiles::LlmServiceProfiles`] (routes to the
/// `embedding` profile) and consumed by the vector index to embed source
/// symbols and query text with the same model.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text`, returning a dense vector. Callers should not assume a
    /// fixed dimensionality across different providers or models.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

#[async_trait]
impl LLMProvider for LlmServiceProfiles {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        self.generate_slow(prompt, system).await
    }
}

#[async_trait]
impl EmbeddingProvider for LlmServiceProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        LlmServiceProfiles::embed(self, text).await
    }
}
