//! Brute-force in-memory index (§4.I): used in tests and in deployments
//! with no configured vector provider. O(n) per query, which is fine at
//! the scale this fallback is meant for.

use std::sync::RwLock;

use async_trait::async_trait;
use domain::{RepoId, SearchFilter, SearchHit, SymbolId};

use crate::error::Result;
use crate::index::{EmbeddingIndex, rank};
use crate::text::cosine_similarity;

struct Entry {
    symbol_id: SymbolId,
    vector: Vec<f32>,
    repo_id: Option<RepoId>,
    language: Option<domain::Language>,
}

pub struct InMemoryEmbeddingIndex {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryEmbeddingIndex {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Vec::new()) }
    }

    /// Tags a later upsert's metadata for filtering; the index otherwise
    /// has no way to know which repo/language a bare vector belongs to.
    pub fn upsert_with_metadata(
        &self,
        symbol_id: SymbolId,
        vector: Vec<f32>,
        repo_id: Option<RepoId>,
        language: Option<domain::Language>,
    ) {
        let mut entries = self.entries.write().unwrap();
        entries.retain(|e| e.symbol_id != symbol_id);
        entries.push(Entry { symbol_id, vector, repo_id, language });
    }
}

impl Default for InMemoryEmbeddingIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingIndex for InMemoryEmbeddingIndex {
    async fn upsert(&self, symbol_id: SymbolId, vector: Vec<f32>) -> Result<()> {
        self.upsert_with_metadata(symbol_id, vector, None, None);
        Ok(())
    }

    async fn upsert_with_metadata(
        &self,
        symbol_id: SymbolId,
        vector: Vec<f32>,
        repo_id: Option<RepoId>,
        language: Option<domain::Language>,
    ) -> Result<()> {
        InMemoryEmbeddingIndex::upsert_with_metadata(self, symbol_id, vector, repo_id, language);
        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        filter: SearchFilter,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        let entries = self.entries.read().unwrap();
        let hits: Vec<SearchHit> = entries
            .iter()
            .filter(|e| filter.repo_id.is_none_or(|want| e.repo_id == Some(want)))
            .filter(|e| filter.language.is_none_or(|want| e.language == Some(want)))
            .map(|e| SearchHit { symbol_id: e.symbol_id, similarity: cosine_similarity(&vector, &e.vector) })
            .filter(|hit| hit.similarity >= threshold)
            .collect();
        Ok(rank(hits, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_hits_above_threshold_ranked_descending() {
        let index = InMemoryEmbeddingIndex::new();
        index.upsert(SymbolId(1), vec![1.0, 0.0]).await.unwrap();
        index.upsert(SymbolId(2), vec![0.0, 1.0]).await.unwrap();
        let hits = index.query(vec![1.0, 0.0], 0.5, SearchFilter::default(), 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol_id, SymbolId(1));
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_symbol_id() {
        let index = InMemoryEmbeddingIndex::new();
        index.upsert(SymbolId(1), vec![1.0, 0.0]).await.unwrap();
        index.upsert(SymbolId(1), vec![0.0, 1.0]).await.unwrap();
        let entries = index.entries.read().unwrap();
        assert_eq!(entries.len(), 1);
    }
}
