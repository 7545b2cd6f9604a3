//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by provider and
//! role:
//!
//! - **Slow**     → high-quality, slower model (refine/verify)
//! - **Fast**     → lower-quality, faster model (drafting)
//! - **Embedding**→ embedding generator
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = provider kind (`ollama` or `openai`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = slow/quality model (mandatory)
//! - `OLLAMA_MODEL_FAST_MODEL` or `OLLAMA_MODEL_FAST` = fast/speed model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//!
//! OpenAI-specific:
//! - `OPENAI_URL` (default `https://api.openai.com`)
//! - `OPENAI_API_KEY`   = API key (mandatory)
//! - `OPENAI_MODEL`     = slow/quality model (mandatory)
//! - `OPENAI_MODEL_FAST`= fast/speed model (mandatory)
//! - `OPENAI_EMBEDDING_MODEL` = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error::{ConfigError, LlmError, env_opt_u32, must_env},
};

fn ollama_endpoint() -> Result<String, LlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

/// Constructs a config for the **slow/quality** Ollama model.
pub fn config_ollama_slow() -> Result<LlmModelConfig, LlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(600),
    })
}

/// Constructs a config for the **fast/speed** Ollama model.
pub fn config_ollama_fast() -> Result<LlmModelConfig, LlmError> {
    let endpoint = ollama_endpoint()?;
    let model = std::env::var("OLLAMA_MODEL_FAST_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| std::env::var("OLLAMA_MODEL_FAST").ok())
        .ok_or(ConfigError::MissingVar(
            "OLLAMA_MODEL_FAST_MODEL or OLLAMA_MODEL_FAST",
        ))?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(0.7),
        top_p: Some(0.9),
        timeout_secs: Some(600),
    })
}

/// Constructs a config for the **embedding** Ollama model.
pub fn config_ollama_embedding() -> Result<LlmModelConfig, LlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Constructs a config for the **slow/quality** OpenAI model.
pub fn config_openai_slow() -> Result<LlmModelConfig, LlmError> {
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(60),
    })
}

/// Constructs a config for the **fast/speed** OpenAI model.
pub fn config_openai_fast() -> Result<LlmModelConfig, LlmError> {
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_MODEL_FAST")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.7),
        top_p: Some(0.9),
        timeout_secs: Some(30),
    })
}

/// Constructs a config for the **embedding** OpenAI model.
pub fn config_openai_embedding() -> Result<LlmModelConfig, LlmError> {
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}
