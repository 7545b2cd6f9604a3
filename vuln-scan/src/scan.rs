//! Rule-based scan over one file's source (§4.H.1).

use domain::{FileId, NewVulnerability};

use crate::rules::{self, Rule};

pub fn scan_file(file_id: FileId, source: &str) -> Vec<NewVulnerability> {
    let catalogue = rules::catalogue();
    let mut findings = Vec::new();
    for rule in &catalogue {
        findings.extend(apply_rule(file_id, source, rule));
    }
    coalesce(findings)
}

fn apply_rule(file_id: FileId, source: &str, rule: &Rule) -> Vec<NewVulnerability> {
    let mut out = Vec::new();
    for (line_idx, line) in source.lines().enumerate() {
        if let Some(m) = rule.pattern.find(line) {
            out.push(NewVulnerability {
                file_id,
                line: line_idx as u32 + 1,
                rule_id: rule.rule_id.to_string(),
                severity: rule.severity,
                cwe: Some(rule.cwe.to_string()),
                category: rule.category.to_string(),
                description: rule.description.to_string(),
                confidence: rule.confidence,
                code_snippet: m.as_str().trim().to_string(),
            });
        }
    }
    out
}

/// Coalesces duplicate findings: same rule, same file, lines within 2 of
/// each other (§4.H: "Duplicate findings (same rule + file + line ± 2) are
/// coalesced"). Findings share a `file_id` by construction (one file per
/// call), so only `rule_id` and line proximity are compared.
fn coalesce(mut findings: Vec<NewVulnerability>) -> Vec<NewVulnerability> {
    findings.sort_by(|a, b| a.rule_id.cmp(&b.rule_id).then(a.line.cmp(&b.line)));
    let mut out: Vec<NewVulnerability> = Vec::with_capacity(findings.len());
    for finding in findings {
        let is_duplicate = out
            .iter()
            .rev()
            .take_while(|prev| prev.rule_id == finding.rule_id)
            .any(|prev| finding.line.abs_diff(prev.line) <= 2);
        if !is_duplicate {
            out.push(finding);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_hardcoded_secret() {
        let findings = scan_file(FileId(1), "password = \"hunter2!!\"\n");
        assert!(findings.iter().any(|f| f.rule_id == "hardcoded-secret"));
    }

    #[test]
    fn nearby_repeated_hits_are_coalesced() {
        let source = "password = \"aaaaaa\"\npassword = \"bbbbbb\"\n";
        let findings = scan_file(FileId(1), source);
        let secret_hits = findings.iter().filter(|f| f.rule_id == "hardcoded-secret").count();
        assert_eq!(secret_hits, 1);
    }

    #[test]
    fn clean_source_has_no_findings() {
        let findings = scan_file(FileId(1), "def add(a, b):\n    return a + b\n");
        assert!(findings.is_empty());
    }
}
