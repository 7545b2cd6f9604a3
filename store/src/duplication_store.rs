use domain::{DuplicationPair, FileId, LineRange, NewDuplicationPair, RepoId};
use rusqlite::params;

use crate::error::Result;
use crate::Storage;

impl Storage {
    pub fn insert_duplication_pairs(&self, repo_id: RepoId, pairs: &[NewDuplicationPair]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for p in pairs {
            tx.execute(
                "INSERT INTO duplication_pairs
                    (repo_id, file1_id, file1_start, file1_end, file2_id, file2_start, file2_end,
                     similarity, duplicate_lines, duplicate_tokens)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    repo_id.get(),
                    p.file1_id.get(),
                    p.file1_range.start,
                    p.file1_range.end,
                    p.file2_id.get(),
                    p.file2_range.start,
                    p.file2_range.end,
                    p.similarity,
                    p.duplicate_lines,
                    p.duplicate_tokens,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_duplication_pairs(&self, repo_id: RepoId) -> Result<Vec<DuplicationPair>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, repo_id, file1_id, file1_start, file1_end, file2_id, file2_start,
                    file2_end, similarity, duplicate_lines, duplicate_tokens
             FROM duplication_pairs WHERE repo_id = ?1 ORDER BY similarity DESC",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            Ok(DuplicationPair {
                id: row.get(0)?,
                repo_id: RepoId(row.get(1)?),
                file1_id: FileId(row.get(2)?),
                file1_range: LineRange { start: row.get(3)?, end: row.get(4)? },
                file2_id: FileId(row.get(5)?),
                file2_range: LineRange { start: row.get(6)?, end: row.get(7)? },
                similarity: row.get(8)?,
                duplicate_lines: row.get(9)?,
                duplicate_tokens: row.get(10)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
