//! Gathers the frozen metrics snapshot `evaluate` runs against (§4.K, §8
//! property 8: `Check` is a pure function of config + frozen metrics).

use domain::{RepoId, Severity};

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub symbol_count: usize,
    pub avg_complexity: f64,
    pub max_complexity: u32,
    pub total_smells: u32,
    pub critical_smells: u32,
    pub total_vulnerabilities: u32,
    pub critical_vulnerabilities: u32,
    pub duplication_percentage: f64,
}

/// Reads every input `evaluate` needs straight from the store — §4.A's
/// read-committed isolation is sufficient here; a `Check` over a still-
/// ingesting repo just evaluates whatever has landed so far.
pub fn snapshot(storage: &store::Storage, repo_id: RepoId) -> Result<MetricsSnapshot> {
    let symbols = storage.list_symbols(&domain::SymbolFilter { repo_id: Some(repo_id), ..Default::default() })?;
    let smells = storage.list_code_smells(repo_id)?;
    let vulns = storage.list_vulnerabilities(repo_id)?;
    let duplication = storage.list_duplication_pairs(repo_id)?;
    let files = storage.list_files(repo_id)?;

    let symbol_count = symbols.len();
    let avg_complexity = if symbol_count == 0 {
        0.0
    } else {
        symbols.iter().map(|s| s.cyclomatic_complexity as f64).sum::<f64>() / symbol_count as f64
    };
    let max_complexity = symbols.iter().map(|s| s.cyclomatic_complexity).max().unwrap_or(0);

    let critical_smells = smells.iter().filter(|s| s.severity == Severity::Critical).count() as u32;
    let critical_vulnerabilities =
        vulns.iter().filter(|v| v.severity == Severity::Critical).count() as u32;

    let total_loc: u64 = files.iter().map(|f| f.line_count as u64).sum();
    let duplicate_lines: u64 = duplication.iter().map(|d| d.duplicate_lines as u64).sum();
    let duplication_percentage = if total_loc == 0 {
        0.0
    } else {
        (duplicate_lines as f64 / total_loc as f64 * 100.0).min(100.0)
    };

    Ok(MetricsSnapshot {
        symbol_count,
        avg_complexity,
        max_complexity,
        total_smells: smells.len() as u32,
        critical_smells,
        total_vulnerabilities: vulns.len() as u32,
        critical_vulnerabilities,
        duplication_percentage,
    })
}
