//! Hand-rolled brace-matching scanner for C (§4.D): no lightweight,
//! always-available C grammar is already in this workspace's dependency
//! set, so top-level function definitions, typedef'd structs/unions, and
//! `#include` directives are found with a textual scan instead of a full
//! parse. Signatures are preserved verbatim.

use regex::Regex;
use std::sync::LazyLock;

use domain::{CallSite, ImportSite, SymbolKind};

use crate::error::Result;
use crate::types::{ParseOutput, RawSymbol};

static FN_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[A-Za-z_][A-Za-z0-9_ \t\*]*[\s\*]([A-Za-z_][A-Za-z0-9_]*)\s*\(([^;{}]*)\)\s*\{")
        .unwrap()
});
static TYPEDEF_STRUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)typedef\s+(struct|union)\s*[A-Za-z0-9_]*\s*\{.*?\}\s*([A-Za-z_][A-Za-z0-9_]*)\s*;").unwrap()
});
static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*#\s*include\s*[<"]([^">]+)[">]"#).unwrap()
});
static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap()
});
static CONTROL_KEYWORDS: &[&str] =
    &["if", "for", "while", "switch", "return", "sizeof", "else"];

pub fn parse(source: &str, _path: &str) -> Result<ParseOutput> {
    let mut out = ParseOutput::default();

    for cap in INCLUDE.captures_iter(source) {
        let line = line_of(source, cap.get(0).unwrap().start());
        out.imports.push(ImportSite { module_name: cap[1].to_string(), line });
    }

    for cap in TYPEDEF_STRUCT.captures_iter(source) {
        let m = cap.get(0).unwrap();
        let (line_start, line_end) = span_lines(source, m.start(), m.end());
        out.symbols.push(RawSymbol {
            name: cap[2].to_string(),
            kind: SymbolKind::Class,
            line_start,
            line_end,
            signature: m.as_str().lines().next().unwrap_or_default().trim().to_string(),
            docstring: preceding_doc_comment(source, m.start()),
            calls: Vec::new(),
        });
    }

    for cap in FN_SIGNATURE.captures_iter(source) {
        let whole = cap.get(0).unwrap();
        let name = &cap[1];
        if CONTROL_KEYWORDS.contains(&name) {
            continue;
        }
        let Some(body_end) = matching_brace(source, whole.end() - 1) else { continue };
        let (line_start, line_end) = span_lines(source, whole.start(), body_end);
        let body = &source[whole.end()..body_end];
        out.symbols.push(RawSymbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            line_start,
            line_end,
            signature: whole.as_str().trim_end_matches('{').trim().to_string(),
            docstring: preceding_doc_comment(source, whole.start()),
            calls: collect_calls(body, whole.end(), source),
        });
    }

    Ok(out)
}

fn line_of(source: &str, byte_offset: usize) -> u32 {
    source[..byte_offset].bytes().filter(|&b| b == b'\n').count() as u32 + 1
}

fn span_lines(source: &str, start: usize, end: usize) -> (u32, u32) {
    (line_of(source, start), line_of(source, end))
}

/// An immediately preceding `/** ... */` block comment (§4.E docstring
/// extraction for C), allowing blank lines but not other code between the
/// comment and the symbol.
fn preceding_doc_comment(source: &str, start: usize) -> Option<String> {
    let before = &source[..start];
    let trimmed = before.trim_end_matches([' ', '\t', '\n', '\r']);
    if !trimmed.ends_with("*/") {
        return None;
    }
    let comment_start = trimmed.rfind("/**")?;
    let comment = &trimmed[comment_start..];
    let inner = comment
        .trim_start_matches("/**")
        .trim_end_matches("*/")
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if inner.is_empty() { None } else { Some(inner) }
}

/// Finds the index of the `}` matching the `{` at `open_brace_idx`.
fn matching_brace(source: &str, open_brace_idx: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0i32;
    let mut i = open_brace_idx;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn collect_calls(body: &str, body_offset: usize, source: &str) -> Vec<CallSite> {
    let mut calls = Vec::new();
    for cap in CALL.captures_iter(body) {
        let name = &cap[1];
        if CONTROL_KEYWORDS.contains(&name) {
            continue;
        }
        let m = cap.get(0).unwrap();
        calls.push(CallSite {
            callee_name: name.to_string(),
            line: line_of(source, body_offset + m.start()),
        });
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_top_level_function() {
        let out = parse("int add(int a, int b) {\n    return a + b;\n}\n", "f.c").unwrap();
        assert_eq!(out.symbols.len(), 1);
        assert_eq!(out.symbols[0].name, "add");
        assert_eq!(out.symbols[0].kind, SymbolKind::Function);
    }

    #[test]
    fn include_is_an_import() {
        let out = parse("#include <stdio.h>\n\nint main() { return 0; }\n", "f.c").unwrap();
        assert_eq!(out.imports.len(), 1);
        assert_eq!(out.imports[0].module_name, "stdio.h");
    }

    #[test]
    fn doc_comment_precedes_function() {
        let src = "/** Adds two numbers. */\nint add(int a, int b) {\n    return a + b;\n}\n";
        let out = parse(src, "f.c").unwrap();
        assert_eq!(out.symbols[0].docstring.as_deref(), Some("Adds two numbers."));
    }

    #[test]
    fn calls_within_body_are_collected() {
        let src = "int helper(void) { return 1; }\nint main(void) {\n    return helper();\n}\n";
        let out = parse(src, "f.c").unwrap();
        let main_sym = out.symbols.iter().find(|s| s.name == "main").unwrap();
        assert!(main_sym.calls.iter().any(|c| c.callee_name == "helper"));
    }
}
