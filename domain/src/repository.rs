use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RepoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoSource {
    Upload,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryStatus {
    Pending,
    Cloning,
    Parsing,
    Analyzing,
    Completed,
    Failed,
}

impl RepositoryStatus {
    /// Collapsed status vocabulary exposed to API callers (§7):
    /// `completed | failed | processing`.
    pub fn public_label(&self) -> &'static str {
        match self {
            RepositoryStatus::Completed => "completed",
            RepositoryStatus::Failed => "failed",
            _ => "processing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: RepoId,
    pub source: RepoSource,
    pub origin_url: Option<String>,
    pub branch: Option<String>,
    pub archive_path: Option<String>,
    pub status: RepositoryStatus,
    pub file_count: i64,
    pub symbol_count: i64,
    pub stars: Option<i64>,
    pub primary_language: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set when `status == Failed`; the reason recorded per §7.
    pub failure_reason: Option<String>,
}

/// Input to `Storage::create_repository`.
#[derive(Debug, Clone)]
pub struct RepositorySpec {
    pub source: RepoSource,
    pub origin_url: Option<String>,
    pub branch: Option<String>,
    pub archive_path: Option<String>,
}
