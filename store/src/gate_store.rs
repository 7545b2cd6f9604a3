use chrono::Utc;
use domain::{
    CicdRun, GateResult, QualityGateConfig, RepoId, RunStatus, TriggeredBy,
};
use rusqlite::{OptionalExtension, params};

use crate::error::Result;
use crate::Storage;

fn triggered_by_str(t: TriggeredBy) -> &'static str {
    match t {
        TriggeredBy::Manual => "manual",
        TriggeredBy::Webhook => "webhook",
        TriggeredBy::PreCommit => "pre-commit",
    }
}

fn parse_triggered_by(s: &str) -> TriggeredBy {
    match s {
        "webhook" => TriggeredBy::Webhook,
        "pre-commit" => TriggeredBy::PreCommit,
        _ => TriggeredBy::Manual,
    }
}

fn status_str(s: RunStatus) -> &'static str {
    match s {
        RunStatus::Running => "running",
        RunStatus::Passed => "passed",
        RunStatus::Failed => "failed",
        RunStatus::Error => "error",
    }
}

fn parse_status(s: &str) -> RunStatus {
    match s {
        "passed" => RunStatus::Passed,
        "failed" => RunStatus::Failed,
        "error" => RunStatus::Error,
        _ => RunStatus::Running,
    }
}

impl Storage {
    pub fn get_gate_config(&self, repo_id: RepoId) -> Result<QualityGateConfig> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT max_complexity, max_code_smells, max_critical_smells, max_vulnerabilities,
                        max_critical_vulnerabilities, min_quality_score, max_duplication_percentage,
                        block_on_failure
                 FROM quality_gate_configs WHERE repo_id = ?1",
                params![repo_id.get()],
                |row| {
                    Ok(QualityGateConfig {
                        repo_id,
                        max_complexity: row.get(0)?,
                        max_code_smells: row.get(1)?,
                        max_critical_smells: row.get(2)?,
                        max_vulnerabilities: row.get(3)?,
                        max_critical_vulnerabilities: row.get(4)?,
                        min_quality_score: row.get(5)?,
                        max_duplication_percentage: row.get(6)?,
                        block_on_failure: row.get::<_, i64>(7)? != 0,
                    })
                },
            )
            .optional()?;

        Ok(found.unwrap_or(QualityGateConfig { repo_id, ..QualityGateConfig::default() }))
    }

    pub fn put_gate_config(&self, config: &QualityGateConfig) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO quality_gate_configs
                (repo_id, max_complexity, max_code_smells, max_critical_smells,
                 max_vulnerabilities, max_critical_vulnerabilities, min_quality_score,
                 max_duplication_percentage, block_on_failure)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(repo_id) DO UPDATE SET
                max_complexity = excluded.max_complexity,
                max_code_smells = excluded.max_code_smells,
                max_critical_smells = excluded.max_critical_smells,
                max_vulnerabilities = excluded.max_vulnerabilities,
                max_critical_vulnerabilities = excluded.max_critical_vulnerabilities,
                min_quality_score = excluded.min_quality_score,
                max_duplication_percentage = excluded.max_duplication_percentage,
                block_on_failure = excluded.block_on_failure",
            params![
                config.repo_id.get(),
                config.max_complexity,
                config.max_code_smells,
                config.max_critical_smells,
                config.max_vulnerabilities,
                config.max_critical_vulnerabilities,
                config.min_quality_score,
                config.max_duplication_percentage,
                config.block_on_failure as i64,
            ],
        )?;
        Ok(())
    }

    /// Creates a `running` CICDRun row, returning its id. Run-id assignment
    /// is serialized by SQLite's writer lock (§5: "serialised for run-id
    /// assignment but may evaluate in parallel").
    pub fn start_cicd_run(
        &self,
        repo_id: RepoId,
        branch: Option<&str>,
        commit: Option<&str>,
        pr_number: Option<i64>,
        triggered_by: TriggeredBy,
    ) -> Result<i64> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO cicd_runs (repo_id, branch, commit_sha, pr_number, triggered_by, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'running', ?6)",
            params![repo_id.get(), branch, commit, pr_number, triggered_by_str(triggered_by), now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Terminal-state transition (§4.K state machine); a superseding event
    /// must create a new run rather than reopening this one.
    pub fn complete_cicd_run(&self, run_id: i64, result: &GateResult) -> Result<()> {
        let conn = self.conn()?;
        let status = if result.passed { RunStatus::Passed } else { RunStatus::Failed };
        let now = Utc::now().to_rfc3339();
        let payload = serde_json::to_string(result)?;
        conn.execute(
            "UPDATE cicd_runs SET status = ?1, gate_result = ?2, completed_at = ?3 WHERE id = ?4",
            params![status_str(status), payload, now, run_id],
        )?;
        Ok(())
    }

    pub fn error_cicd_run(&self, run_id: i64, reason: &str) -> Result<()> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let payload = serde_json::json!({ "error": reason }).to_string();
        conn.execute(
            "UPDATE cicd_runs SET status = 'error', gate_result = ?1, completed_at = ?2 WHERE id = ?3",
            params![payload, now, run_id],
        )?;
        Ok(())
    }

    /// Looks up one run by its own id, independent of repository — the
    /// HTML report endpoint (§6 `/report/:run`) only has a run id in hand.
    pub fn get_cicd_run(&self, run_id: i64) -> Result<CicdRun> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, repo_id, branch, commit_sha, pr_number, triggered_by, status, gate_result,
                    created_at, completed_at
             FROM cicd_runs WHERE id = ?1",
            params![run_id],
            |row| {
                let gate_raw: Option<String> = row.get(7)?;
                let created_raw: String = row.get(8)?;
                let completed_raw: Option<String> = row.get(9)?;
                Ok(CicdRun {
                    id: row.get(0)?,
                    repo_id: RepoId(row.get(1)?),
                    branch: row.get(2)?,
                    commit: row.get(3)?,
                    pr_number: row.get(4)?,
                    triggered_by: parse_triggered_by(&row.get::<_, String>(5)?),
                    status: parse_status(&row.get::<_, String>(6)?),
                    gate_result: gate_raw.and_then(|s| serde_json::from_str(&s).ok()),
                    created_at: created_raw.parse().unwrap_or_else(|_| Utc::now()),
                    completed_at: completed_raw.and_then(|s| s.parse().ok()),
                })
            },
        )
        .optional()?
        .ok_or_else(|| crate::error::StoreError::NotFound(format!("cicd_run {run_id}")))
    }

    pub fn list_cicd_runs(&self, repo_id: RepoId) -> Result<Vec<CicdRun>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, repo_id, branch, commit_sha, pr_number, triggered_by, status, gate_result,
                    created_at, completed_at
             FROM cicd_runs WHERE repo_id = ?1 ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            let gate_raw: Option<String> = row.get(7)?;
            let created_raw: String = row.get(8)?;
            let completed_raw: Option<String> = row.get(9)?;
            Ok(CicdRun {
                id: row.get(0)?,
                repo_id: RepoId(row.get(1)?),
                branch: row.get(2)?,
                commit: row.get(3)?,
                pr_number: row.get(4)?,
                triggered_by: parse_triggered_by(&row.get::<_, String>(5)?),
                status: parse_status(&row.get::<_, String>(6)?),
                gate_result: gate_raw.and_then(|s| serde_json::from_str(&s).ok()),
                created_at: created_raw.parse().unwrap_or_else(|_| Utc::now()),
                completed_at: completed_raw.and_then(|s| s.parse().ok()),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
