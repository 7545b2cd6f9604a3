//! Turns a parser's [`RawSymbol`]s into [`NewSymbol`]s carrying complexity,
//! maintainability, and line-count metrics (§4.E). Parsing and metrics are
//! deliberately separate crates: a parser never computes a metric, and this
//! crate never walks a grammar.

mod complexity;
mod loc;
mod mi;

use domain::{ComplexityBucket, Language, MaintainabilityBucket, NewSymbol};
use symbol_parser::{ParseOutput, RawSymbol};

/// Slices the 1-based inclusive `[line_start, line_end]` range out of a
/// file's full source text.
fn symbol_body(source: &str, line_start: u32, line_end: u32) -> String {
    let start = line_start.saturating_sub(1) as usize;
    let lines: Vec<&str> = source.lines().collect();
    if start >= lines.len() {
        return String::new();
    }
    let end = (line_end as usize).min(lines.len());
    lines[start..end].join("\n")
}

pub fn build_symbol(language: Language, source: &str, raw: &RawSymbol) -> NewSymbol {
    let body = symbol_body(source, raw.line_start, raw.line_end);
    let cyclomatic_complexity = complexity::cyclomatic_complexity(language, &body);
    let counts = loc::count_lines(language, &body);
    let mi = mi::maintainability_index(cyclomatic_complexity, counts.loc);

    NewSymbol {
        name: raw.name.clone(),
        kind: raw.kind,
        line_start: raw.line_start,
        line_end: raw.line_end,
        signature: raw.signature.clone(),
        docstring: raw.docstring.clone(),
        cyclomatic_complexity,
        maintainability_index: mi.mi,
        mi_approximated: mi.approximated,
        loc: counts.loc,
        comment_lines: counts.comment_lines,
        blank_lines: counts.blank_lines,
    }
}

/// Metrics for every symbol a parser found in one file, preserving order.
pub fn build_symbols(language: Language, source: &str, parsed: &ParseOutput) -> Vec<NewSymbol> {
    parsed.symbols.iter().map(|raw| build_symbol(language, source, raw)).collect()
}

pub fn complexity_bucket(complexity: u32) -> ComplexityBucket {
    ComplexityBucket::from_complexity(complexity)
}

pub fn maintainability_bucket(mi: f64) -> MaintainabilityBucket {
    MaintainabilityBucket::from_mi(mi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SymbolKind;

    #[test]
    fn builds_new_symbol_with_metrics() {
        let source = "def f(a, b):\n    if a:\n        return b\n    return a\n";
        let raw = RawSymbol {
            name: "f".into(),
            kind: SymbolKind::Function,
            line_start: 1,
            line_end: 4,
            signature: "def f(a, b)".into(),
            docstring: None,
            calls: Vec::new(),
        };
        let sym = build_symbol(Language::Python, source, &raw);
        assert_eq!(sym.cyclomatic_complexity, 2);
        assert_eq!(sym.loc, 4);
        assert!(sym.maintainability_index >= 0.0 && sym.maintainability_index <= 100.0);
    }
}
