use std::fmt;

/// Backend used for large-language-model inference.
///
/// Distinguishes a local Ollama runtime from the OpenAI-compatible HTTP API.
/// Adding another provider (Anthropic, Mistral, ...) means extending this
/// enum and the matching arm in [`crate::profiles::LlmServiceProfiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI-compatible chat/embeddings API.
    OpenAI,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Ollama => f.write_str("Ollama"),
            LlmProvider::OpenAI => f.write_str("OpenAI"),
        }
    }
}
