use chrono::Utc;
use domain::{RepoId, RepoSource, Repository, RepositorySpec, RepositoryStatus};
use rusqlite::{OptionalExtension, params};

use crate::error::{Result, StoreError};
use crate::Storage;

fn source_str(s: RepoSource) -> &'static str {
    match s {
        RepoSource::Upload => "upload",
        RepoSource::Remote => "remote",
    }
}

fn parse_source(s: &str) -> RepoSource {
    match s {
        "remote" => RepoSource::Remote,
        _ => RepoSource::Upload,
    }
}

fn status_str(s: RepositoryStatus) -> &'static str {
    match s {
        RepositoryStatus::Pending => "pending",
        RepositoryStatus::Cloning => "cloning",
        RepositoryStatus::Parsing => "parsing",
        RepositoryStatus::Analyzing => "analyzing",
        RepositoryStatus::Completed => "completed",
        RepositoryStatus::Failed => "failed",
    }
}

fn parse_status(s: &str) -> RepositoryStatus {
    match s {
        "cloning" => RepositoryStatus::Cloning,
        "parsing" => RepositoryStatus::Parsing,
        "analyzing" => RepositoryStatus::Analyzing,
        "completed" => RepositoryStatus::Completed,
        "failed" => RepositoryStatus::Failed,
        _ => RepositoryStatus::Pending,
    }
}

impl Storage {
    /// Creates a Repository row in `pending` state. Fails with
    /// `StoreError::Duplicate` if a remote repo with the same
    /// `(origin_url, branch)` already exists (§3 Uniqueness, §8 S4).
    pub fn create_repository(&self, spec: RepositorySpec) -> Result<RepoId> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let res = conn.execute(
            "INSERT INTO repositories (source, origin_url, branch, archive_path, status, created_at)
             VALUES (?1, ?2, ?3, ?4, 'pending', ?5)",
            params![
                source_str(spec.source),
                spec.origin_url,
                spec.branch,
                spec.archive_path,
                now,
            ],
        );

        match res {
            Ok(_) => Ok(RepoId(conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Duplicate {
                    origin_url: spec.origin_url.unwrap_or_default(),
                    branch: spec.branch.unwrap_or_default(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_repository(&self, id: RepoId) -> Result<Repository> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, source, origin_url, branch, archive_path, status, file_count,
                    symbol_count, stars, primary_language, created_at, failure_reason
             FROM repositories WHERE id = ?1",
            params![id.get()],
            row_to_repository,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("repository {id}")))
    }

    pub fn list_repositories(&self) -> Result<Vec<Repository>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, source, origin_url, branch, archive_path, status, file_count,
                    symbol_count, stars, primary_language, created_at, failure_reason
             FROM repositories ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_repository)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Atomically updates status and, when provided, the persisted
    /// file/symbol counts (invariant 5 of §3).
    pub fn update_repository_status(
        &self,
        id: RepoId,
        status: RepositoryStatus,
        counts: Option<(i64, i64)>,
        failure_reason: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn()?;
        if let Some((files, symbols)) = counts {
            conn.execute(
                "UPDATE repositories SET status = ?1, file_count = ?2, symbol_count = ?3,
                 failure_reason = ?4 WHERE id = ?5",
                params![status_str(status), files, symbols, failure_reason, id.get()],
            )?;
        } else {
            conn.execute(
                "UPDATE repositories SET status = ?1, failure_reason = ?2 WHERE id = ?3",
                params![status_str(status), failure_reason, id.get()],
            )?;
        }
        Ok(())
    }

    pub fn set_primary_language(&self, id: RepoId, language: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE repositories SET primary_language = ?1 WHERE id = ?2",
            params![language, id.get()],
        )?;
        Ok(())
    }
}

fn row_to_repository(row: &rusqlite::Row) -> rusqlite::Result<Repository> {
    let created_raw: String = row.get(10)?;
    Ok(Repository {
        id: RepoId(row.get(0)?),
        source: parse_source(&row.get::<_, String>(1)?),
        origin_url: row.get(2)?,
        branch: row.get(3)?,
        archive_path: row.get(4)?,
        status: parse_status(&row.get::<_, String>(5)?),
        file_count: row.get(6)?,
        symbol_count: row.get(7)?,
        stars: row.get(8)?,
        primary_language: row.get(9)?,
        created_at: created_raw
            .parse()
            .unwrap_or_else(|_| Utc::now()),
        failure_reason: row.get(11)?,
    })
}
