use domain::{CodeSmell, FileId, NewCodeSmell, RepoId, SymbolId};
use rusqlite::params;

use crate::error::Result;
use crate::Storage;
use crate::vuln_store::{parse_severity, severity_str};

impl Storage {
    pub fn insert_code_smells(&self, repo_id: RepoId, items: &[NewCodeSmell]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for s in items {
            tx.execute(
                "INSERT INTO code_smells
                    (repo_id, smell_type, severity, title, description, suggestion, file_id,
                     symbol_id, location)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    repo_id.get(),
                    s.smell_type,
                    severity_str(s.severity),
                    s.title,
                    s.description,
                    s.suggestion,
                    s.file_id.get(),
                    s.symbol_id.map(|id| id.get()),
                    s.location,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_code_smells(&self, repo_id: RepoId) -> Result<Vec<CodeSmell>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, repo_id, smell_type, severity, title, description, suggestion, file_id,
                    symbol_id, location
             FROM code_smells WHERE repo_id = ?1 ORDER BY severity DESC, id",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            Ok(CodeSmell {
                id: row.get(0)?,
                repo_id: RepoId(row.get(1)?),
                smell_type: row.get(2)?,
                severity: parse_severity(&row.get::<_, String>(3)?),
                title: row.get(4)?,
                description: row.get(5)?,
                suggestion: row.get(6)?,
                file_id: FileId(row.get(7)?),
                symbol_id: row.get::<_, Option<i64>>(8)?.map(SymbolId),
                location: row.get(9)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
