//! Durable repo/file/symbol/vector store (§4.A).
//!
//! Backed by SQLite (bundled, via `rusqlite`) in WAL mode, which gives the
//! read-committed isolation the spec asks for: readers never block behind
//! an in-flight writer and never observe a partially-committed ingest.
//! Each ingest phase (parse / analyze / embed) runs inside one transaction;
//! `Storage` is the single writer-synchronization point the job scheduler
//! relies on (§4.J's per-repository exclusion is enforced by the scheduler,
//! not here — this crate only guarantees that a single phase is atomic).

pub mod duplication_store;
pub mod embedding_store;
pub mod error;
pub mod file_store;
pub mod gate_store;
pub mod repository_store;
pub mod schema;
pub mod smell_store;
pub mod symbol_store;
pub mod vuln_store;

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

pub use error::{Result, StoreError};

pub type Pooled = r2d2::PooledConnection<SqliteConnectionManager>;

/// Handle to the durable store. Cheap to clone (wraps a connection pool)
/// and safe to share across the scheduler's worker pool.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<SqliteConnectionManager>,
}

impl Storage {
    /// Opens (creating if absent) the SQLite database at `path` and applies
    /// the schema. `path` of `":memory:"` gives an ephemeral store, used in
    /// tests.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        });
        let pool = Pool::builder().build(manager)?;
        let conn = pool.get()?;
        schema::apply(&conn)?;
        info!(path = %path.as_ref().display(), "storage opened");
        Ok(Self { pool })
    }

    /// In-memory store for tests; each call gets an isolated database.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        let conn = pool.get()?;
        schema::apply(&conn)?;
        Ok(Self { pool })
    }

    pub(crate) fn conn(&self) -> Result<Pooled> {
        Ok(self.pool.get()?)
    }
}
