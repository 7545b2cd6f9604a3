//! Dead-code detection (§4.F.3): symbols nobody calls, and aren't an entry
//! point, are reported with a severity derived from how much work they
//! themselves would waste if never run.

use std::collections::HashMap;

use domain::{CallEdge, Language, Symbol, SymbolId, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeadCodeSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone)]
pub struct DeadCodeFinding {
    pub symbol_id: SymbolId,
    pub name: String,
    pub file_id: domain::FileId,
    pub severity: DeadCodeSeverity,
    pub outgoing_calls: usize,
}

fn is_entry_point(symbol: &Symbol, language: Option<Language>) -> bool {
    if symbol.kind == SymbolKind::Variable {
        // Module-level executable statements run on import; never dead.
        return true;
    }
    match language {
        Some(lang) => lang.default_entry_points().iter().any(|ep| ep.eq_ignore_ascii_case(&symbol.name)),
        None => false,
    }
}

/// `file_language` maps a symbol's `file_id` to its detected language, so
/// entry-point names can be looked up per language.
pub fn find_dead_code(
    symbols: &[Symbol],
    resolved_edges: &[CallEdge],
    file_language: &HashMap<domain::FileId, Language>,
) -> Vec<DeadCodeFinding> {
    let mut in_degree: HashMap<SymbolId, u32> = HashMap::new();
    let mut out_degree: HashMap<SymbolId, usize> = HashMap::new();
    for sym in symbols {
        in_degree.entry(sym.id).or_insert(0);
        out_degree.entry(sym.id).or_insert(0);
    }
    for edge in resolved_edges {
        *out_degree.entry(edge.from_symbol_id).or_insert(0) += 1;
        if let Some(to) = edge.to_symbol_id {
            *in_degree.entry(to).or_insert(0) += 1;
        }
    }

    let mut findings: Vec<DeadCodeFinding> = symbols
        .iter()
        .filter(|sym| in_degree.get(&sym.id).copied().unwrap_or(0) == 0)
        .filter(|sym| !is_entry_point(sym, file_language.get(&sym.file_id).copied()))
        .map(|sym| {
            let outgoing = out_degree.get(&sym.id).copied().unwrap_or(0);
            let severity = match outgoing {
                0 => DeadCodeSeverity::Low,
                1 | 2 => DeadCodeSeverity::Medium,
                _ => DeadCodeSeverity::High,
            };
            DeadCodeFinding {
                symbol_id: sym.id,
                name: sym.name.clone(),
                file_id: sym.file_id,
                severity,
                outgoing_calls: outgoing,
            }
        })
        .collect();

    // Sorted by severity (high first) then by file path isn't available
    // here (only file_id); caller sorts by path once files are joined.
    findings.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.file_id.cmp(&b.file_id)));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::FileId;

    fn symbol(id: i64, name: &str, kind: SymbolKind) -> Symbol {
        Symbol {
            id: SymbolId(id),
            file_id: FileId(1),
            name: name.to_string(),
            kind,
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

    /// S5: `a -> b -> c`, nobody calls `a`. Only in-degree counts, so `a` is
    /// dead (and made severity=high since it itself makes one call... here
    /// it makes exactly one outgoing call, so medium) while `b` and `c` are
    /// live by virtue of their in-degree, regardless of reachability from
    /// `a`'s subgraph.
    #[test]
    fn scenario_s5_only_uncalled_root_is_dead() {
        use domain::CallEdge;
        let symbols = vec![
            symbol(1, "a", SymbolKind::Function),
            symbol(2, "b", SymbolKind::Function),
            symbol(3, "c", SymbolKind::Function),
        ];
        let edges = vec![
            CallEdge {
                from_symbol_id: SymbolId(1),
                to_name: "b".into(),
                to_symbol_id: Some(SymbolId(2)),
                file_id: FileId(1),
                line: 1,
                is_external: false,
            },
            CallEdge {
                from_symbol_id: SymbolId(2),
                to_name: "c".into(),
                to_symbol_id: Some(SymbolId(3)),
                file_id: FileId(1),
                line: 2,
                is_external: false,
            },
        ];
        let findings = find_dead_code(&symbols, &edges, &HashMap::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "a");
        assert_eq!(findings[0].severity, DeadCodeSeverity::Medium);
    }

    #[test]
    fn uncalled_function_is_dead() {
        let symbols = vec![symbol(1, "unused", SymbolKind::Function)];
        let findings = find_dead_code(&symbols, &[], &HashMap::new());
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn entry_point_name_is_never_dead() {
        let symbols = vec![symbol(1, "main", SymbolKind::Function)];
        let mut langs = HashMap::new();
        langs.insert(FileId(1), Language::C);
        let findings = find_dead_code(&symbols, &[], &langs);
        assert!(findings.is_empty());
    }

    #[test]
    fn module_level_variable_is_never_dead() {
        let symbols = vec![symbol(1, "CONFIG", SymbolKind::Variable)];
        let findings = find_dead_code(&symbols, &[], &HashMap::new());
        assert!(findings.is_empty());
    }
}
