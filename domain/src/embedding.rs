use serde::{Deserialize, Serialize};

use crate::ids::SymbolId;

/// A unit-length embedding vector for one symbol. `dim` is global and fixed
/// for the lifetime of a deployment (`VECTOR_DIM`); invariant 4 of §3
/// requires `vector.len() == dim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub symbol_id: SymbolId,
    pub dim: usize,
    pub vector: Vec<f32>,
}

impl Embedding {
    pub fn new(symbol_id: SymbolId, vector: Vec<f32>) -> Self {
        let dim = vector.len();
        Self { symbol_id, dim, vector }
    }

    pub fn norm(&self) -> f32 {
        self.vector.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

/// One ranked hit from `EmbeddingIndex::query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol_id: SymbolId,
    pub similarity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub language: Option<crate::language::Language>,
    pub repo_id: Option<crate::ids::RepoId>,
}
