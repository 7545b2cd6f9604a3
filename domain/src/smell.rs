use serde::{Deserialize, Serialize};

use crate::ids::{FileId, RepoId, SymbolId};
use crate::vulnerability::Severity;

pub use Severity as SmellSeverity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSmell {
    pub id: i64,
    pub repo_id: RepoId,
    pub smell_type: String,
    pub severity: SmellSeverity,
    pub title: String,
    pub description: String,
    pub suggestion: String,
    pub file_id: FileId,
    pub symbol_id: Option<SymbolId>,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct NewCodeSmell {
    pub smell_type: String,
    pub severity: SmellSeverity,
    pub title: String,
    pub description: String,
    pub suggestion: String,
    pub file_id: FileId,
    pub symbol_id: Option<SymbolId>,
    pub location: String,
}
