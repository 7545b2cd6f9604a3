//! Resolves call sites into a symbol graph and reports dead code and
//! circular dependencies over it (§4.F). Runs as a follow-up job after
//! ingest, once symbols and raw call edges are persisted.

mod cycles;
mod dead_code;
mod import_graph;
mod resolve;

pub use cycles::{CircularDependency, CycleSeverity, find_cycles};
pub use dead_code::{DeadCodeFinding, DeadCodeSeverity, find_dead_code};
pub use import_graph::{FileCycle, find_import_cycles, resolve_imports};
pub use resolve::resolve;

use std::collections::HashMap;

use domain::{CallEdge, File, FileId, Language, Symbol};

pub struct CallGraphReport {
    pub resolved_edges: Vec<CallEdge>,
    pub dead_code: Vec<DeadCodeFinding>,
    pub cycles: Vec<CircularDependency>,
}

/// Runs the full §4.F pipeline for one repository: resolve call sites,
/// then derive dead-code and cycle findings from the resolved graph.
pub fn analyze(symbols: &[Symbol], raw_edges: &[CallEdge], files: &[File]) -> CallGraphReport {
    let resolved_edges = resolve::resolve(symbols, raw_edges);

    let file_language: HashMap<FileId, Language> =
        files.iter().filter_map(|f| f.language.map(|l| (f.id, l))).collect();

    let dead_code = dead_code::find_dead_code(symbols, &resolved_edges, &file_language);
    let cycles = cycles::find_cycles(symbols, &resolved_edges);

    CallGraphReport { resolved_edges, dead_code, cycles }
}
