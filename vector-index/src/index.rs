//! The `EmbeddingIndex` contract (§4.I): upsert is idempotent by
//! `symbol_id`; query is synchronous from the caller's perspective (one
//! request, one response, bounded by a deadline) and ranks by cosine
//! similarity with ties broken by symbol id.

use async_trait::async_trait;
use domain::{Language, RepoId, SearchFilter, SearchHit, SymbolId};

use crate::error::Result;

#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    async fn upsert(&self, symbol_id: SymbolId, vector: Vec<f32>) -> Result<()>;

    /// Same as `upsert`, tagging the vector with the repo/language it was
    /// embedded from so `query`'s `SearchFilter` has something to match
    /// against. Defaults to the untagged `upsert` for implementations that
    /// don't support filtering.
    async fn upsert_with_metadata(
        &self,
        symbol_id: SymbolId,
        vector: Vec<f32>,
        _repo_id: Option<RepoId>,
        _language: Option<Language>,
    ) -> Result<()> {
        self.upsert(symbol_id, vector).await
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        filter: SearchFilter,
        k: usize,
    ) -> Result<Vec<SearchHit>>;
}

/// Sorts by similarity descending, ties broken by symbol id ascending —
/// shared by every `EmbeddingIndex` implementation so ordering is
/// consistent regardless of backend.
pub fn rank(mut hits: Vec<SearchHit>, k: usize) -> Vec<SearchHit> {
    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.symbol_id.cmp(&b.symbol_id))
    });
    hits.truncate(k);
    hits
}
