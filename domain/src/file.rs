use serde::{Deserialize, Serialize};

use crate::ids::{FileId, RepoId};
use crate::language::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: FileId,
    pub repo_id: RepoId,
    /// POSIX-normalised, repo-relative path.
    pub path: String,
    pub language: Option<Language>,
    pub byte_size: i64,
    pub line_count: i64,
    pub sha256: String,
}

/// Row shape for `Storage::bulk_insert_files`, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub path: String,
    pub language: Option<Language>,
    pub byte_size: i64,
    pub line_count: i64,
    pub sha256: String,
}
