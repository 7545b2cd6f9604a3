use domain::{Embedding, SymbolId};
use rusqlite::{OptionalExtension, params};

use crate::error::Result;
use crate::Storage;

fn vector_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_vector(b: &[u8]) -> Vec<f32> {
    b.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

impl Storage {
    /// Idempotent (§4.I): a repeated upsert for the same `symbol_id`
    /// replaces the prior vector.
    pub fn upsert_embedding(&self, embedding: &Embedding) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO embeddings (symbol_id, dim, vector) VALUES (?1, ?2, ?3)
             ON CONFLICT(symbol_id) DO UPDATE SET dim = excluded.dim, vector = excluded.vector",
            params![embedding.symbol_id.get(), embedding.dim as i64, vector_to_bytes(&embedding.vector)],
        )?;
        Ok(())
    }

    pub fn get_embedding(&self, symbol_id: SymbolId) -> Result<Option<Embedding>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT dim, vector FROM embeddings WHERE symbol_id = ?1",
                params![symbol_id.get()],
                |row| {
                    let dim: i64 = row.get(0)?;
                    let bytes: Vec<u8> = row.get(1)?;
                    Ok((dim, bytes))
                },
            )
            .optional()?;
        Ok(row.map(|(dim, bytes)| Embedding {
            symbol_id,
            dim: dim as usize,
            vector: bytes_to_vector(&bytes),
        }))
    }

    /// Loads every embedding for a repo (used by the in-memory/brute-force
    /// `EmbeddingIndex` implementation to rebuild its working set).
    pub fn list_embeddings(&self, repo_id: domain::RepoId) -> Result<Vec<Embedding>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT e.symbol_id, e.dim, e.vector FROM embeddings e
             JOIN symbols s ON s.id = e.symbol_id
             JOIN files f ON f.id = s.file_id
             WHERE f.repo_id = ?1",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            let symbol_id = SymbolId(row.get(0)?);
            let dim: i64 = row.get(1)?;
            let bytes: Vec<u8> = row.get(2)?;
            Ok(Embedding { symbol_id, dim: dim as usize, vector: bytes_to_vector(&bytes) })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
