use domain::{Confidence, FileId, NewVulnerability, RepoId, Severity, Vulnerability};
use rusqlite::params;

use crate::error::Result;
use crate::Storage;

pub(crate) fn severity_str(s: Severity) -> &'static str {
    match s {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Critical => "critical",
    }
}

pub(crate) fn parse_severity(s: &str) -> Severity {
    match s {
        "medium" => Severity::Medium,
        "high" => Severity::High,
        "critical" => Severity::Critical,
        _ => Severity::Low,
    }
}

fn confidence_str(c: Confidence) -> &'static str {
    match c {
        Confidence::Low => "low",
        Confidence::Medium => "medium",
        Confidence::High => "high",
    }
}

fn parse_confidence(s: &str) -> Confidence {
    match s {
        "medium" => Confidence::Medium,
        "high" => Confidence::High,
        _ => Confidence::Low,
    }
}

impl Storage {
    pub fn insert_vulnerabilities(&self, repo_id: RepoId, items: &[NewVulnerability]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for v in items {
            tx.execute(
                "INSERT INTO vulnerabilities
                    (repo_id, file_id, line, rule_id, severity, cwe, category, description,
                     confidence, code_snippet)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    repo_id.get(),
                    v.file_id.get(),
                    v.line,
                    v.rule_id,
                    severity_str(v.severity),
                    v.cwe,
                    v.category,
                    v.description,
                    confidence_str(v.confidence),
                    v.code_snippet,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_vulnerabilities(&self, repo_id: RepoId) -> Result<Vec<Vulnerability>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, repo_id, file_id, line, rule_id, severity, cwe, category, description,
                    confidence, code_snippet
             FROM vulnerabilities WHERE repo_id = ?1 ORDER BY severity DESC, id",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            Ok(Vulnerability {
                id: row.get(0)?,
                repo_id: RepoId(row.get(1)?),
                file_id: FileId(row.get(2)?),
                line: row.get(3)?,
                rule_id: row.get(4)?,
                severity: parse_severity(&row.get::<_, String>(5)?),
                cwe: row.get(6)?,
                category: row.get(7)?,
                description: row.get(8)?,
                confidence: parse_confidence(&row.get::<_, String>(9)?),
                code_snippet: row.get(10)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
