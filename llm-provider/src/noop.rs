//! Deterministic, dependency-free fallbacks for [`crate::LLMProvider`] and
//! [`crate::EmbeddingProvider`], used in tests and in deployments with no
//! configured backend (§4.I, §4.H: "LLM failures are non-fatal").

use async_trait::async_trait;

use crate::error::LlmError;
use crate::{EmbeddingProvider, LLMProvider};

/// Always reports "no smells, nothing to say" — callers degrade to
/// rule-only scanning when this is the active provider.
pub struct NoopLLMProvider;

#[async_trait]
impl LLMProvider for NoopLLMProvider {
    async fn complete(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        Ok(String::new())
    }
}

/// A hash-based pseudo-embedding: deterministic, dimension-stable, and
/// entirely local. Not semantically meaningful, only useful so the rest of
/// the pipeline (and its tests) can exercise the `EmbeddingIndex` contract
/// without a live embedding backend.
pub struct NoopEmbeddingProvider {
    dim: usize,
}

impl NoopEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl EmbeddingProvider for NoopEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let mut vector = vec![0.0f32; self.dim];
        for (i, byte) in text.bytes().enumerate() {
            let slot = i % self.dim;
            vector[slot] += (byte as f32 + 1.0) * ((i as f32 % 7.0) + 1.0);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeds_to_the_requested_dimension() {
        let provider = NoopEmbeddingProvider::new(16);
        let vector = provider.embed("fn foo()").await.unwrap();
        assert_eq!(vector.len(), 16);
    }

    #[tokio::test]
    async fn same_text_embeds_identically() {
        let provider = NoopEmbeddingProvider::new(8);
        let a = provider.embed("hello world").await.unwrap();
        let b = provider.embed("hello world").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn complete_degrades_to_empty_response() {
        let provider = NoopLLMProvider;
        let text = provider.complete("anything", None).await.unwrap();
        assert!(text.is_empty());
    }
}
