//! Circular-dependency detection (§4.F.4): strongly connected components of
//! size ≥ 2, plus self-loops, reported in lexicographic order of the
//! smallest member name.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use domain::{CallEdge, Symbol, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CycleSeverity {
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone)]
pub struct CircularDependency {
    pub members: Vec<SymbolId>,
    pub member_names: Vec<String>,
    pub severity: CycleSeverity,
}

fn severity_for_size(size: usize) -> CycleSeverity {
    match size {
        0..=2 => CycleSeverity::Medium,
        3..=4 => CycleSeverity::High,
        _ => CycleSeverity::Critical,
    }
}

pub fn find_cycles(symbols: &[Symbol], resolved_edges: &[CallEdge]) -> Vec<CircularDependency> {
    let mut graph: DiGraph<SymbolId, ()> = DiGraph::new();
    let mut node_of: HashMap<SymbolId, NodeIndex> = HashMap::new();
    let mut name_of: HashMap<SymbolId, String> = HashMap::new();

    for sym in symbols {
        let idx = graph.add_node(sym.id);
        node_of.insert(sym.id, idx);
        name_of.insert(sym.id, sym.name.clone());
    }

    let mut self_loops: HashMap<SymbolId, bool> = HashMap::new();
    for edge in resolved_edges {
        let Some(to) = edge.to_symbol_id else { continue };
        let (Some(&from_idx), Some(&to_idx)) = (node_of.get(&edge.from_symbol_id), node_of.get(&to)) else {
            continue;
        };
        graph.add_edge(from_idx, to_idx, ());
        if edge.from_symbol_id == to {
            self_loops.insert(to, true);
        }
    }

    let mut cycles = Vec::new();

    for scc in tarjan_scc(&graph) {
        if scc.len() >= 2 {
            let mut members: Vec<SymbolId> = scc.iter().map(|&idx| graph[idx]).collect();
            members.sort();
            let member_names: Vec<String> =
                members.iter().map(|id| name_of.get(id).cloned().unwrap_or_default()).collect();
            cycles.push(CircularDependency {
                severity: severity_for_size(members.len()),
                members,
                member_names,
            });
        } else if let Some(&idx) = scc.first() {
            let id = graph[idx];
            if self_loops.get(&id).copied().unwrap_or(false) {
                cycles.push(CircularDependency {
                    members: vec![id],
                    member_names: vec![name_of.get(&id).cloned().unwrap_or_default()],
                    severity: CycleSeverity::Medium,
                });
            }
        }
    }

    cycles.sort_by(|a, b| {
        let a_min = a.member_names.iter().min().cloned().unwrap_or_default();
        let b_min = b.member_names.iter().min().cloned().unwrap_or_default();
        a_min.cmp(&b_min)
    });
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{FileId, SymbolKind};

    fn symbol(id: i64, name: &str) -> Symbol {
        Symbol {
            id: SymbolId(id),
            file_id: FileId(1),
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

    fn edge(from: i64, to: i64) -> CallEdge {
        CallEdge {
            from_symbol_id: SymbolId(from),
            to_name: String::new(),
            to_symbol_id: Some(SymbolId(to)),
            file_id: FileId(1),
            line: 1,
            is_external: false,
        }
    }

    #[test]
    fn mutual_recursion_is_a_cycle() {
        let symbols = vec![symbol(1, "a"), symbol(2, "b")];
        let edges = vec![edge(1, 2), edge(2, 1)];
        let cycles = find_cycles(&symbols, &edges);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].severity, CycleSeverity::Medium);
    }

    #[test]
    fn self_recursive_function_is_a_cycle() {
        let symbols = vec![symbol(1, "fact")];
        let edges = vec![edge(1, 1)];
        let cycles = find_cycles(&symbols, &edges);
        assert_eq!(cycles.len(), 1);
    }

    /// S6: `a -> b -> c -> a` is one SCC `[a,b,c]`, severity=high.
    #[test]
    fn scenario_s6_three_cycle_is_high_severity() {
        let symbols = vec![symbol(1, "a"), symbol(2, "b"), symbol(3, "c")];
        let edges = vec![edge(1, 2), edge(2, 3), edge(3, 1)];
        let cycles = find_cycles(&symbols, &edges);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].severity, CycleSeverity::High);
        assert_eq!(cycles[0].member_names, vec!["a", "b", "c"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let symbols = vec![symbol(1, "a"), symbol(2, "b")];
        let edges = vec![edge(1, 2)];
        assert!(find_cycles(&symbols, &edges).is_empty());
    }
}
