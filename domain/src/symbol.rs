use serde::{Deserialize, Serialize};

use crate::ids::{FileId, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Method,
    Variable,
    Procedure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityBucket {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityBucket {
    /// §4.E buckets: simple(1–10), moderate(11–20), complex(21–50), very_complex(>50).
    pub fn from_complexity(v: u32) -> Self {
        match v {
            0..=10 => ComplexityBucket::Simple,
            11..=20 => ComplexityBucket::Moderate,
            21..=50 => ComplexityBucket::Complex,
            _ => ComplexityBucket::VeryComplex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintainabilityBucket {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MaintainabilityBucket {
    /// §4.E buckets: excellent(85–100), good(65–84), fair(50–64), poor(<50).
    pub fn from_mi(mi: f64) -> Self {
        if mi >= 85.0 {
            MaintainabilityBucket::Excellent
        } else if mi >= 65.0 {
            MaintainabilityBucket::Good
        } else if mi >= 50.0 {
            MaintainabilityBucket::Fair
        } else {
            MaintainabilityBucket::Poor
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub file_id: FileId,
    pub name: String,
    pub kind: SymbolKind,
    pub line_start: u32,
    pub line_end: u32,
    pub signature: String,
    pub docstring: Option<String>,
    pub has_docstring: bool,
    pub docstring_length: u32,
    pub cyclomatic_complexity: u32,
    pub maintainability_index: f64,
    /// True when Halstead volume wasn't computable and LOC was substituted
    /// for it in the MI formula (§4.E).
    pub mi_approximated: bool,
    pub loc: u32,
    pub comment_lines: u32,
    pub blank_lines: u32,
}

impl Symbol {
    pub fn complexity_bucket(&self) -> ComplexityBucket {
        ComplexityBucket::from_complexity(self.cyclomatic_complexity)
    }

    pub fn maintainability_bucket(&self) -> MaintainabilityBucket {
        MaintainabilityBucket::from_mi(self.maintainability_index)
    }
}

/// Row shape for a symbol produced by a parser, before a `SymbolId` has
/// been assigned. Grouped under its owning file by the caller (the file is
/// implicit in that grouping, not carried here).
#[derive(Debug, Clone)]
pub struct NewSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line_start: u32,
    pub line_end: u32,
    pub signature: String,
    pub docstring: Option<String>,
    pub cyclomatic_complexity: u32,
    pub maintainability_index: f64,
    pub mi_approximated: bool,
    pub loc: u32,
    pub comment_lines: u32,
    pub blank_lines: u32,
}

impl NewSymbol {
    pub fn has_docstring(&self) -> bool {
        self.docstring_length() > 0
    }

    pub fn docstring_length(&self) -> u32 {
        self.docstring.as_deref().map(|s| s.len() as u32).unwrap_or(0)
    }
}

/// Filter accepted by `Storage::list_symbols`.
#[derive(Debug, Clone, Default)]
pub struct SymbolFilter {
    pub repo_id: Option<crate::ids::RepoId>,
    pub file_id: Option<FileId>,
    pub kind: Option<SymbolKind>,
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
