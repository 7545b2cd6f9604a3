//! Error types and env-validation helpers for `llm-provider`.
//!
//! All error messages carry a `[llm-provider]` prefix so bubbled-up errors
//! are easy to attribute in logs coming from a dependent binary.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/// Result alias for the crate's unified error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Configuration errors, raised while building an [`crate::config::llm_model_config::LlmModelConfig`]
/// from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[llm-provider] missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("[llm-provider] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error("[llm-provider] unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("[llm-provider] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    #[error("[llm-provider] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },

    #[error("[llm-provider] model name must not be empty")]
    EmptyModel,

    #[error("[llm-provider] stop sequences must not contain empty strings")]
    InvalidStopSequence,
}

/// A truncated HTTP error response, kept short enough to log safely.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    pub snippet: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// Kinds of failure a provider call can produce, independent of transport.
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    #[error("invalid provider for this client")]
    InvalidProvider,
    #[error("missing API key")]
    MissingApiKey,
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("unexpected response: {0}")]
    HttpStatus(HttpError),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("provider returned no choices")]
    EmptyChoices,
}

/// A provider-call failure, tagged with which backend produced it.
#[derive(Debug, Error)]
#[error("[llm-provider] {provider} error: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Health-probe specific failures (kept distinct so a probe can degrade
/// gracefully instead of aborting startup).
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("unexpected response: {0}")]
    HttpStatus(HttpError),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Unified error type returned by every public call in this crate.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("[llm-provider] health check failed: {0}")]
    Health(#[from] HealthError),

    #[error("[llm-provider] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Truncates a response body to a safe length for logging.
pub fn make_snippet(body: &str) -> String {
    body.chars().take(240).collect()
}

/* ------------------------ Env helpers ------------------------ */

/// Fetches a required, non-empty environment variable.
pub fn must_env(name: &'static str) -> std::result::Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u32(name: &'static str) -> std::result::Result<Option<u32>, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            v.parse::<u32>().map(Some).map_err(|_| ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> std::result::Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        })
    }
}

/// Validates that a floating-point value lies within an inclusive range.
pub fn validate_range_f32(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> std::result::Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        })
    }
}

/// Ensures that a list of stop sequences contains no empty strings.
pub fn validate_stop_sequences<S>(stops: &[S]) -> std::result::Result<(), ConfigError>
where
    S: AsRef<str>,
{
    if stops.iter().any(|s| s.as_ref().is_empty()) {
        Err(ConfigError::InvalidStopSequence)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_snippet_truncates_long_bodies() {
        let body = "x".repeat(1000);
        assert_eq!(make_snippet(&body).chars().count(), 240);
    }

    #[test]
    fn validate_http_endpoint_rejects_schemeless() {
        assert!(validate_http_endpoint("OLLAMA_URL", "localhost:11434").is_err());
        assert!(validate_http_endpoint("OLLAMA_URL", "http://localhost:11434").is_ok());
    }

    #[test]
    fn validate_range_f32_rejects_out_of_bounds() {
        assert!(validate_range_f32("temperature", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range_f32("temperature", 0.5, 0.0, 1.0).is_ok());
    }

    #[test]
    fn validate_stop_sequences_rejects_empty_entries() {
        assert!(validate_stop_sequences(&["ok", ""]).is_err());
        assert!(validate_stop_sequences(&["ok", "also-ok"]).is_ok());
    }
}
