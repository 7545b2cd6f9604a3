//! Embedding generation, storage, and cosine-similarity query (§4.I).

pub mod error;
mod index;
mod memory;
mod qdrant;
mod text;

pub use error::{Result, VectorIndexError};
pub use index::EmbeddingIndex;
pub use memory::InMemoryEmbeddingIndex;
pub use qdrant::QdrantEmbeddingIndex;
pub use text::{EmbeddingInput, embedding_text, normalize};

pub use llm_provider::EmbeddingProvider;

/// Embeds `text` via `provider` and normalises the result to unit length,
/// the contract every caller of an `EmbeddingIndex` upsert relies on.
pub async fn embed_normalized(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> std::result::Result<Vec<f32>, llm_provider::LlmError> {
    let vector = provider.embed(text).await?;
    Ok(normalize(vector))
}
