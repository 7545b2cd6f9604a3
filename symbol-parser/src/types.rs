use domain::{CallSite, ImportSite, SymbolKind};

/// A symbol as produced directly by a parser, before metrics (complexity,
/// MI, LOC) have been computed — those are `MetricsAnalyzer`'s job (§4.E),
/// not the parser's. Line ranges are 1-based inclusive (§4.D contract).
#[derive(Debug, Clone)]
pub struct RawSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line_start: u32,
    pub line_end: u32,
    pub signature: String,
    pub docstring: Option<String>,
    /// Call sites textually enclosed within this symbol's line range.
    /// Resolution to a target symbol is `CallGraphBuilder`'s job.
    pub calls: Vec<CallSite>,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub symbols: Vec<RawSymbol>,
    pub imports: Vec<ImportSite>,
}
