//! LLM-assisted smell detection (§4.H.2): delegates to an `LLMProvider`,
//! passing a symbol's source and parsing a block-structured response back
//! into `NewCodeSmell` rows. A provider failure degrades to rule-only
//! scanning rather than failing the whole scan.

use regex::Regex;
use std::sync::LazyLock;

use domain::{FileId, NewCodeSmell, SmellSeverity, SymbolId};
use llm_provider::LLMProvider;

const SYSTEM_PROMPT: &str = "You are a static analysis assistant. Given a function's source, \
list code smells as blocks of the form:\nSMELL: <short type>\nSEVERITY: low|medium|high|critical\n\
SUGGESTION: <one-line fix>\n\nOutput nothing else. If there are no smells, output nothing.";

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^SMELL:\s*(.+)\nSEVERITY:\s*(low|medium|high|critical)\nSUGGESTION:\s*(.+)$")
        .unwrap()
});

pub async fn detect_smells(
    provider: &dyn LLMProvider,
    file_id: FileId,
    symbol_id: SymbolId,
    symbol_name: &str,
    source: &str,
) -> Vec<NewCodeSmell> {
    let prompt = format!("Function `{symbol_name}`:\n```\n{source}\n```");
    match provider.complete(&prompt, Some(SYSTEM_PROMPT)).await {
        Ok(response) => parse_response(&response, file_id, symbol_id, symbol_name),
        Err(err) => {
            tracing::warn!(error = %err, symbol = symbol_name, "LLM smell detection failed, degrading to rule-only");
            Vec::new()
        }
    }
}

fn parse_response(response: &str, file_id: FileId, symbol_id: SymbolId, location: &str) -> Vec<NewCodeSmell> {
    BLOCK
        .captures_iter(response)
        .filter_map(|cap| {
            let severity = parse_severity(&cap[2])?;
            Some(NewCodeSmell {
                smell_type: cap[1].trim().to_string(),
                severity,
                title: cap[1].trim().to_string(),
                description: format!("Detected by LLM-assisted review of `{location}`."),
                suggestion: cap[3].trim().to_string(),
                file_id,
                symbol_id: Some(symbol_id),
                location: location.to_string(),
            })
        })
        .collect()
}

fn parse_severity(s: &str) -> Option<SmellSeverity> {
    match s.to_ascii_lowercase().as_str() {
        "low" => Some(SmellSeverity::Low),
        "medium" => Some(SmellSeverity::Medium),
        "high" => Some(SmellSeverity::High),
        "critical" => Some(SmellSeverity::Critical),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm_provider::error::HealthError;
    use llm_provider::LlmError;

    struct StubProvider {
        response: String,
    }

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn complete(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
            Ok(self.response.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LLMProvider for FailingProvider {
        async fn complete(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
            Err(LlmError::Health(HealthError::Decode("stub failure".into())))
        }
    }

    #[tokio::test]
    async fn parses_well_formed_blocks() {
        let provider = StubProvider {
            response: "SMELL: long function\nSEVERITY: medium\nSUGGESTION: split it up\n".into(),
        };
        let smells = detect_smells(&provider, FileId(1), SymbolId(1), "f", "def f(): pass").await;
        assert_eq!(smells.len(), 1);
        assert_eq!(smells[0].smell_type, "long function");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty_list() {
        let smells = detect_smells(&FailingProvider, FileId(1), SymbolId(1), "f", "def f(): pass").await;
        assert!(smells.is_empty());
    }
}
