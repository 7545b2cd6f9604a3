//! Static rule catalogue (§4.H.1): a fixed table of `(rule_id, cwe,
//! category, severity, pattern)`. No AST variant is implemented for any
//! rule yet — every rule here is textual, same as the per-language
//! parsers' own style for C/COBOL/Assembly.

use regex::Regex;

use domain::{Confidence, Severity};

pub struct Rule {
    pub rule_id: &'static str,
    pub cwe: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub confidence: Confidence,
    pub description: &'static str,
    pub pattern: Regex,
}

macro_rules! rule {
    ($rule_id:expr, $cwe:expr, $category:expr, $severity:expr, $confidence:expr, $description:expr, $pattern:expr) => {
        Rule {
            rule_id: $rule_id,
            cwe: $cwe,
            category: $category,
            severity: $severity,
            confidence: $confidence,
            description: $description,
            pattern: Regex::new($pattern).unwrap(),
        }
    };
}

pub fn catalogue() -> Vec<Rule> {
    vec![
        rule!(
            "sql-injection-string-concat",
            "CWE-89",
            "sql_injection",
            Severity::High,
            Confidence::Medium,
            "SQL query built by concatenating untrusted input instead of using parameters.",
            r#"(?i)(SELECT|INSERT|UPDATE|DELETE)[^;"']{0,200}["']\s*\+|(?i)f["'].*\b(SELECT|INSERT|UPDATE|DELETE)\b"#
        ),
        rule!(
            "command-injection-shell-exec",
            "CWE-78",
            "command_injection",
            Severity::Critical,
            Confidence::Medium,
            "Shell command built from untrusted input and executed via a shell.",
            r"(?i)\b(os\.system|subprocess\.(call|run|Popen)\([^)]*shell\s*=\s*True|popen|execl|system)\s*\("
        ),
        rule!(
            "hardcoded-secret",
            "CWE-798",
            "hardcoded_secret",
            Severity::High,
            Confidence::Medium,
            "Credential-like literal assigned directly in source.",
            r#"(?i)\b(password|secret|api[_-]?key|token)\s*[:=]\s*["'][^"'\s]{6,}["']"#
        ),
        rule!(
            "path-traversal",
            "CWE-22",
            "path_traversal",
            Severity::Medium,
            Confidence::Low,
            "File path built from untrusted input without normalisation or containment checks.",
            r#"(?i)\bopen\s*\(\s*[A-Za-z_][A-Za-z0-9_.]*\s*\+"#
        ),
        rule!(
            "xss-unescaped-output",
            "CWE-79",
            "xss",
            Severity::Medium,
            Confidence::Low,
            "Untrusted input written into HTML output without escaping.",
            r#"(?i)\.innerHTML\s*=|render_template_string\s*\("#
        ),
        rule!(
            "unsafe-deserialization",
            "CWE-502",
            "unsafe_deserialization",
            Severity::High,
            Confidence::Medium,
            "Deserializing untrusted data with a format capable of arbitrary code execution.",
            r"(?i)\b(pickle\.loads?|yaml\.load\s*\((?!.*Loader=)|marshal\.loads?)\s*\("
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_all_six_documented_categories() {
        let categories: Vec<_> = catalogue().iter().map(|r| r.category).collect();
        for expected in [
            "sql_injection",
            "command_injection",
            "hardcoded_secret",
            "path_traversal",
            "xss",
            "unsafe_deserialization",
        ] {
            assert!(categories.contains(&expected), "missing rule category {expected}");
        }
    }
}
