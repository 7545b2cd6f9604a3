//! Qdrant-backed `EmbeddingIndex` (§4.I), the same `qdrant-client` crate
//! already used for this codebase's other vector workloads, via a thin
//! facade kept deliberately narrow (create/upsert/search only).

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchParamsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};

use domain::{RepoId, SearchFilter, SearchHit, SymbolId};

use crate::error::{Result, VectorIndexError};
use crate::index::{EmbeddingIndex, rank};

pub struct QdrantEmbeddingIndex {
    client: Qdrant,
    collection: String,
    dim: usize,
}

impl QdrantEmbeddingIndex {
    pub fn new(url: &str, api_key: Option<&str>, collection: &str, dim: usize) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build().map_err(|e| VectorIndexError::Qdrant(e.to_string()))?;
        Ok(Self { client, collection: collection.to_string(), dim })
    }

    pub async fn ensure_collection(&self) -> Result<()> {
        if self.client.collection_info(&self.collection).await.is_ok() {
            return Ok(());
        }
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.dim as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| VectorIndexError::Qdrant(e.to_string()))?;
        Ok(())
    }

    fn tag_metadata(&self, repo_id: Option<RepoId>, language: Option<domain::Language>) -> HashMap<String, qdrant_client::qdrant::Value> {
        let mut payload = HashMap::new();
        if let Some(repo_id) = repo_id {
            payload.insert("repo_id".to_string(), repo_id.get().into());
        }
        if let Some(language) = language {
            payload.insert("language".to_string(), language.as_str().into());
        }
        payload
    }

    pub async fn upsert_with_metadata(
        &self,
        symbol_id: SymbolId,
        vector: Vec<f32>,
        repo_id: Option<RepoId>,
        language: Option<domain::Language>,
    ) -> Result<()> {
        if vector.len() != self.dim {
            return Err(VectorIndexError::DimensionMismatch { expected: self.dim, got: vector.len() });
        }
        let payload = self.tag_metadata(repo_id, language);
        let point = PointStruct::new(symbol_id.get() as u64, vector, payload);
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| VectorIndexError::Qdrant(e.to_string()))?;
        Ok(())
    }
}

fn build_filter(filter: &SearchFilter) -> Option<Filter> {
    let mut must = Vec::new();
    if let Some(repo_id) = filter.repo_id {
        must.push(Condition::matches("repo_id", repo_id.get()));
    }
    if let Some(language) = filter.language {
        must.push(Condition::matches("language", language.as_str().to_string()));
    }
    if must.is_empty() { None } else { Some(Filter::must(must)) }
}

#[async_trait]
impl EmbeddingIndex for QdrantEmbeddingIndex {
    async fn upsert(&self, symbol_id: SymbolId, vector: Vec<f32>) -> Result<()> {
        self.upsert_with_metadata(symbol_id, vector, None, None).await
    }

    async fn upsert_with_metadata(
        &self,
        symbol_id: SymbolId,
        vector: Vec<f32>,
        repo_id: Option<RepoId>,
        language: Option<domain::Language>,
    ) -> Result<()> {
        QdrantEmbeddingIndex::upsert_with_metadata(self, symbol_id, vector, repo_id, language).await
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        filter: SearchFilter,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        let mut builder = SearchPointsBuilder::new(&self.collection, vector, k as u64)
            .with_payload(false)
            .params(SearchParamsBuilder::default());
        if let Some(f) = build_filter(&filter) {
            builder = builder.filter(f);
        }
        let response =
            self.client.search_points(builder).await.map_err(|e| VectorIndexError::Qdrant(e.to_string()))?;

        let hits: Vec<SearchHit> = response
            .result
            .into_iter()
            .filter(|p| p.score >= threshold)
            .filter_map(|p| match p.id.and_then(|id| id.point_id_options) {
                Some(qdrant_client::qdrant::point_id::PointIdOptions::Num(n)) => {
                    Some(SearchHit { symbol_id: SymbolId(n as i64), similarity: p.score })
                }
                _ => None,
            })
            .collect();
        Ok(rank(hits, k))
    }
}
