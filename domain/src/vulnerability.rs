use serde::{Deserialize, Serialize};

use crate::ids::{FileId, RepoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: i64,
    pub repo_id: RepoId,
    pub file_id: FileId,
    pub line: u32,
    pub rule_id: String,
    pub severity: Severity,
    pub cwe: Option<String>,
    pub category: String,
    pub description: String,
    pub confidence: Confidence,
    pub code_snippet: String,
}

#[derive(Debug, Clone)]
pub struct NewVulnerability {
    pub file_id: FileId,
    pub line: u32,
    pub rule_id: String,
    pub severity: Severity,
    pub cwe: Option<String>,
    pub category: String,
    pub description: String,
    pub confidence: Confidence,
    pub code_snippet: String,
}
