use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RepoId;

/// The seven thresholds of §3; `Check` evaluates measured metrics against
/// these and is a pure function of the config plus frozen metrics (§8
/// property 8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityGateConfig {
    pub repo_id: RepoId,
    pub max_complexity: u32,
    pub max_code_smells: u32,
    pub max_critical_smells: u32,
    pub max_vulnerabilities: u32,
    pub max_critical_vulnerabilities: u32,
    pub min_quality_score: f64,
    pub max_duplication_percentage: f64,
    pub block_on_failure: bool,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            repo_id: RepoId(0),
            max_complexity: 20,
            max_code_smells: 25,
            max_critical_smells: 0,
            max_vulnerabilities: 10,
            max_critical_vulnerabilities: 0,
            min_quality_score: 70.0,
            max_duplication_percentage: 15.0,
            block_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggeredBy {
    Manual,
    Webhook,
    PreCommit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Passed,
    Failed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCheck {
    pub name: String,
    pub passed: bool,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    pub passed: bool,
    pub block_merge: bool,
    pub checks: Vec<GateCheck>,
    pub summary: String,
    pub run_id: i64,
    pub quality_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CicdRun {
    pub id: i64,
    pub repo_id: RepoId,
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub pr_number: Option<i64>,
    pub triggered_by: TriggeredBy,
    pub status: RunStatus,
    pub gate_result: Option<GateResult>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
