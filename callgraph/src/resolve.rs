//! Two-pass call-site resolution (§4.F.1): same file first, then
//! repository-wide by exact name. Ambiguous matches (more than one symbol
//! with that name visible at a given pass) are left unresolved rather than
//! guessed at.

use std::collections::HashMap;

use domain::{CallEdge, FileId, Symbol, SymbolId};

struct NameIndex {
    /// name -> candidate symbol ids, scoped to one file.
    by_file: HashMap<(FileId, String), Vec<SymbolId>>,
    /// name -> candidate symbol ids, repository-wide.
    repo_wide: HashMap<String, Vec<SymbolId>>,
}

fn build_index(symbols: &[Symbol]) -> NameIndex {
    let mut by_file: HashMap<(FileId, String), Vec<SymbolId>> = HashMap::new();
    let mut repo_wide: HashMap<String, Vec<SymbolId>> = HashMap::new();
    for sym in symbols {
        by_file.entry((sym.file_id, sym.name.clone())).or_default().push(sym.id);
        repo_wide.entry(sym.name.clone()).or_default().push(sym.id);
    }
    NameIndex { by_file, repo_wide }
}

/// Resolves every edge's `to_symbol_id`. Unresolved callees (no match, or
/// more than one candidate) keep `to_symbol_id = None` and `is_external =
/// false` — the call site is known, its target just isn't.
pub fn resolve(symbols: &[Symbol], edges: &[CallEdge]) -> Vec<CallEdge> {
    let index = build_index(symbols);

    edges
        .iter()
        .cloned()
        .map(|mut edge| {
            if let Some(id) = resolve_one(&index, edge.file_id, &edge.to_name) {
                edge.to_symbol_id = Some(id);
                edge.is_external = false;
            } else {
                edge.to_symbol_id = None;
            }
            edge
        })
        .collect()
}

fn resolve_one(index: &NameIndex, file_id: FileId, name: &str) -> Option<SymbolId> {
    if let Some(candidates) = index.by_file.get(&(file_id, name.to_string())) {
        if candidates.len() == 1 {
            return Some(candidates[0]);
        }
        if candidates.len() > 1 {
            return None;
        }
    }
    match index.repo_wide.get(name) {
        Some(candidates) if candidates.len() == 1 => Some(candidates[0]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SymbolKind;

    fn symbol(id: i64, file_id: i64, name: &str) -> Symbol {
        Symbol {
            id: SymbolId(id),
            file_id: FileId(file_id),
            name: name.to_string(),
            kind: SymbolKind::Function,
            line_start: 1,
            line_end: 1,
            signature: String::new(),
            docstring: None,
            has_docstring: false,
            docstring_length: 0,
            cyclomatic_complexity: 1,
            maintainability_index: 100.0,
            mi_approximated: true,
            loc: 1,
            comment_lines: 0,
            blank_lines: 0,
        }
    }

    fn edge(from: i64, to_name: &str, file_id: i64) -> CallEdge {
        CallEdge {
            from_symbol_id: SymbolId(from),
            to_name: to_name.to_string(),
            to_symbol_id: None,
            file_id: FileId(file_id),
            line: 1,
            is_external: false,
        }
    }

    #[test]
    fn prefers_same_file_match() {
        let symbols = vec![symbol(1, 1, "helper"), symbol(2, 2, "helper")];
        let edges = vec![edge(3, "helper", 1)];
        let resolved = resolve(&symbols, &edges);
        assert_eq!(resolved[0].to_symbol_id, Some(SymbolId(1)));
    }

    #[test]
    fn ambiguous_repo_wide_match_is_unresolved() {
        let symbols = vec![symbol(1, 1, "helper"), symbol(2, 2, "helper")];
        let edges = vec![edge(3, "helper", 9)];
        let resolved = resolve(&symbols, &edges);
        assert_eq!(resolved[0].to_symbol_id, None);
    }

    #[test]
    fn unique_name_with_no_caller_match_falls_back_repo_wide() {
        let symbols = vec![symbol(1, 1, "unique_fn")];
        let edges = vec![edge(3, "unique_fn", 2)];
        let resolved = resolve(&symbols, &edges);
        assert_eq!(resolved[0].to_symbol_id, Some(SymbolId(1)));
    }
}
