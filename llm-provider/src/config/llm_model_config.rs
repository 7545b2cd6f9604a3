use crate::config::llm_provider::LlmProvider;

/// Configuration for a single LLM model invocation.
///
/// # Examples
///
/// ```
/// use llm_provider::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(2048),
///     temperature: Some(0.7),
///     top_p: None,
///     timeout_secs: Some(30),
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM backend (Ollama, OpenAI).
    pub provider: LlmProvider,
    /// Model identifier string (e.g. `"gpt-4"`, `"llama3"`).
    pub model: String,
    /// Inference endpoint base URL (no trailing path).
    pub endpoint: String,
    /// Optional API key for authenticated providers.
    pub api_key: Option<String>,
    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,
    /// Optional request timeout in seconds.
    pub timeout_secs: Option<u64>,
}
