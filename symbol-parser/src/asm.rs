//! Label-based scanner for assembly sources (§4.D): a label followed by
//! instruction lines becomes a `function` symbol that runs until the next
//! label or end of file. `.include`/`%include` directives are imports;
//! contiguous preceding `;`/`//` comment lines are the docstring.

use regex::Regex;
use std::sync::LazyLock;

use domain::{CallSite, ImportSite, SymbolKind};

use crate::error::Result;
use crate::types::{ParseOutput, RawSymbol};

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_.$][A-Za-z0-9_.$]*):").unwrap());
static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:\.include|%include)\s+["<]?([^">\s]+)[">]?"#).unwrap()
});
static CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:call|jmp|jsr|bl|bsr)\s+([A-Za-z_.$][A-Za-z0-9_.$]*)").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:;|//)\s?(.*)$").unwrap());

struct Label {
    name: String,
    line_start: u32,
    docstring: Option<String>,
    body_start: usize,
}

pub fn parse(source: &str, _path: &str) -> Result<ParseOutput> {
    let lines: Vec<&str> = source.lines().collect();
    let mut out = ParseOutput::default();

    let mut doc_buffer: Vec<String> = Vec::new();
    let mut open: Option<Label> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx as u32 + 1;

        if let Some(cap) = COMMENT.captures(raw) {
            let text = cap[1].trim();
            if !text.is_empty() {
                doc_buffer.push(text.to_string());
            }
            continue;
        }

        if let Some(cap) = INCLUDE.captures(raw) {
            out.imports.push(ImportSite { module_name: cap[1].to_string(), line: line_no });
            doc_buffer.clear();
            continue;
        }

        if let Some(cap) = LABEL.captures(raw) {
            if let Some(prev) = open.take() {
                close_label(&mut out, prev, line_no.saturating_sub(1), &lines[..idx]);
            }
            let docstring = if doc_buffer.is_empty() { None } else { Some(doc_buffer.join(" ")) };
            doc_buffer.clear();
            open = Some(Label {
                name: cap[1].to_string(),
                line_start: line_no,
                docstring,
                body_start: idx + 1,
            });
            continue;
        }

        if !raw.trim().is_empty() {
            doc_buffer.clear();
        }
    }

    if let Some(prev) = open.take() {
        let last_line = lines.len() as u32;
        close_label(&mut out, prev, last_line, &lines);
    }

    Ok(out)
}

fn close_label(out: &mut ParseOutput, open: Label, end_line: u32, all_lines: &[&str]) {
    let body = &all_lines[open.body_start.min(all_lines.len())..];
    let calls = collect_calls(body, open.body_start as u32 + 1);
    out.symbols.push(RawSymbol {
        name: open.name,
        kind: SymbolKind::Function,
        line_start: open.line_start,
        line_end: end_line,
        signature: String::new(),
        docstring: open.docstring,
        calls,
    });
}

fn collect_calls(body: &[&str], first_line: u32) -> Vec<CallSite> {
    let mut calls = Vec::new();
    for (i, line) in body.iter().enumerate() {
        if let Some(cap) = CALL.captures(line) {
            calls.push(CallSite { callee_name: cap[1].to_string(), line: first_line + i as u32 });
        }
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_becomes_function() {
        let src = "_start:\n    mov eax, 1\n    ret\n";
        let out = parse(src, "a.asm").unwrap();
        assert_eq!(out.symbols.len(), 1);
        assert_eq!(out.symbols[0].name, "_start");
    }

    #[test]
    fn include_is_an_import() {
        let out = parse("%include \"macros.inc\"\n", "a.asm").unwrap();
        assert_eq!(out.imports[0].module_name, "macros.inc");
    }

    #[test]
    fn comment_block_becomes_docstring() {
        let src = "; Entry point.\n; Clears registers.\n_start:\n    ret\n";
        let out = parse(src, "a.asm").unwrap();
        assert_eq!(out.symbols[0].docstring.as_deref(), Some("Entry point. Clears registers."));
    }

    #[test]
    fn call_like_instructions_are_collected() {
        let src = "_start:\n    call helper\n    ret\nhelper:\n    ret\n";
        let out = parse(src, "a.asm").unwrap();
        let start = out.symbols.iter().find(|s| s.name == "_start").unwrap();
        assert!(start.calls.iter().any(|c| c.callee_name == "helper"));
    }
}
