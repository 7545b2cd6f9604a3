use serde::{Deserialize, Serialize};

use crate::ids::{FileId, SymbolId};

/// A directed reference from one symbol to a callee name. Multi-edges are
/// allowed; `to_symbol_id` is `None` for unresolved or external callees —
/// resolution is `CallGraphBuilder`'s job, not the parser's (§4.D, §4.F).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEdge {
    pub from_symbol_id: SymbolId,
    pub to_name: String,
    pub to_symbol_id: Option<SymbolId>,
    pub file_id: FileId,
    pub line: u32,
    pub is_external: bool,
}

/// Raw call site as produced by a `SymbolParser`, before the enclosing
/// symbol and any resolution has been attached.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub callee_name: String,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Module,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from_file_id: FileId,
    pub to_file_id: Option<FileId>,
    pub to_module_name: String,
    pub kind: ImportKind,
}

/// Raw import site as produced by a `SymbolParser`.
#[derive(Debug, Clone)]
pub struct ImportSite {
    pub module_name: String,
    pub line: u32,
}
