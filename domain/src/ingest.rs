//! Shared shape for one parsed file, passed from the parser registry (§4.D)
//! through the metrics analyzer (§4.E) to the store's atomic ingest-phase
//! write (§4.A).

use crate::call_graph::{CallSite, ImportSite};
use crate::file::NewFile;
use crate::symbol::NewSymbol;

#[derive(Debug, Clone)]
pub struct SymbolIngest {
    pub symbol: NewSymbol,
    /// Call sites textually enclosed in this symbol's line range.
    pub calls: Vec<CallSite>,
}

#[derive(Debug, Clone)]
pub struct FileIngest {
    pub new_file: NewFile,
    pub content: Vec<u8>,
    pub symbols: Vec<SymbolIngest>,
    pub imports: Vec<ImportSite>,
    /// Set when the parser failed on this file; the file is still recorded
    /// (so `file_count` stays accurate) but carries no symbols (§7).
    pub parse_error: Option<String>,
}
