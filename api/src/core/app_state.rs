use std::sync::Arc;

use llm_provider::{EmbeddingProvider, LLMProvider};
use vector_index::EmbeddingIndex;

use crate::core::config::Config;
use crate::core::pipeline::PipelineRunner;

/// Shared state for every handler, built once in [`crate::start`] and
/// cloned cheaply (everything inside is an `Arc`) into each request.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<store::Storage>,
    pub scheduler: Arc<job_scheduler::JobScheduler<PipelineRunner>>,
    pub gate: quality_gate::QualityGateEngine,
    pub parsers: Arc<symbol_parser::ParserRegistry>,
    pub embedding_index: Arc<dyn EmbeddingIndex>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub llm_provider: Arc<dyn LLMProvider>,
    pub config: Config,
}
