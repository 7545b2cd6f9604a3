//! Column-aware line scanner for fixed-format COBOL (§4.D): the sequence
//! area (columns 1–6) is ignored, column 7 is the indicator area (`*`
//! marks a comment line), and paragraph/section headers in Area A (column
//! 8 onward) become `procedure` symbols. `COPY` directives are imports.

use regex::Regex;
use std::sync::LazyLock;

use domain::{CallSite, ImportSite, SymbolKind};

use crate::error::Result;
use crate::types::{ParseOutput, RawSymbol};

const INDICATOR_COL: usize = 6;
const AREA_A_START: usize = 7;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z0-9][A-Z0-9-]*)\s*(SECTION)?\s*\.\s*$").unwrap()
});
static COPY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bCOPY\s+([A-Z0-9][A-Z0-9-]*)").unwrap());
static PERFORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPERFORM\s+([A-Z0-9][A-Z0-9-]*)").unwrap());

struct Line<'a> {
    number: u32,
    indicator: char,
    area: &'a str,
    raw: &'a str,
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    source
        .lines()
        .enumerate()
        .map(|(i, raw)| {
            let indicator = raw.chars().nth(INDICATOR_COL).unwrap_or(' ');
            let area = if raw.len() > AREA_A_START { &raw[AREA_A_START..] } else { "" };
            Line { number: i as u32 + 1, indicator, area, raw }
        })
        .collect()
}

/// A paragraph/section header currently being accumulated into a symbol.
struct Open {
    name: String,
    line_start: u32,
    docstring: Option<String>,
    body_start: usize,
}

pub fn parse(source: &str, _path: &str) -> Result<ParseOutput> {
    let lines = split_lines(source);
    let mut out = ParseOutput::default();

    let mut doc_buffer: Vec<String> = Vec::new();
    let mut open: Option<Open> = None;

    for (idx, line) in lines.iter().enumerate() {
        if line.indicator == '*' || line.indicator == '/' {
            let comment = line.area.trim_start_matches('*').trim();
            if !comment.is_empty() {
                doc_buffer.push(comment.to_string());
            }
            continue;
        }

        if let Some(cap) = COPY.captures(line.raw) {
            out.imports.push(ImportSite { module_name: cap[1].to_string(), line: line.number });
        }

        let trimmed_area = line.area.trim_end();
        if let Some(cap) = HEADER.captures(trimmed_area) {
            if let Some(prev) = open.take() {
                push_symbol(&mut out, prev, line.number.saturating_sub(1), &lines[..idx]);
            }
            let docstring = if doc_buffer.is_empty() { None } else { Some(doc_buffer.join(" ")) };
            doc_buffer.clear();
            open = Some(Open {
                name: cap[1].to_string(),
                line_start: line.number,
                docstring,
                body_start: idx + 1,
            });
        } else {
            doc_buffer.clear();
        }
    }

    if let Some(prev) = open.take() {
        let last_line = lines.last().map(|l| l.number).unwrap_or(prev.line_start);
        push_symbol(&mut out, prev, last_line, &lines);
    }

    Ok(out)
}

fn push_symbol(out: &mut ParseOutput, open: Open, end_line: u32, all_lines: &[Line]) {
    let calls = collect_performs(&all_lines[open.body_start.min(all_lines.len())..]);
    out.symbols.push(RawSymbol {
        name: open.name,
        kind: SymbolKind::Procedure,
        line_start: open.line_start,
        line_end: end_line,
        signature: String::new(),
        docstring: open.docstring,
        calls,
    });
}

fn collect_performs(body: &[Line]) -> Vec<CallSite> {
    let mut calls = Vec::new();
    for line in body {
        for cap in PERFORM.captures_iter(line.raw) {
            calls.push(CallSite { callee_name: cap[1].to_string(), line: line.number });
        }
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(s: &str) -> String {
        format!("      {s}")
    }

    #[test]
    fn paragraph_header_becomes_procedure() {
        let src = format!(
            "{}\n{}\n{}\n",
            col(" MAIN-PARA."),
            col("     DISPLAY 'HI'."),
            col(" END-PARA.")
        );
        let out = parse(&src, "P.CBL").unwrap();
        assert!(out.symbols.iter().any(|s| s.name.eq_ignore_ascii_case("MAIN-PARA")));
    }

    #[test]
    fn copy_directive_is_import() {
        let src = col(" COPY CUSTREC.\n");
        let out = parse(&src, "P.CBL").unwrap();
        assert_eq!(out.imports.len(), 1);
        assert_eq!(out.imports[0].module_name, "CUSTREC");
    }

    #[test]
    fn asterisk_column_is_a_comment_not_code() {
        let mut line = " ".repeat(6);
        line.push('*');
        line.push_str(" a note");
        let out = parse(&format!("{line}\n"), "P.CBL").unwrap();
        assert!(out.symbols.is_empty());
        assert!(out.imports.is_empty());
    }
}
