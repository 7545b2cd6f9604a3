//! HTTP surface (§6): a thin axum router wiring each route to the store
//! and analysis crates, and the process bootstrap that wires the
//! scheduler's [`core::pipeline::PipelineRunner`] to the fixed
//! Ingest -> Parse -> fan-out phase sequence.

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use std::sync::Arc;

use llm_provider::config::default_config;
use llm_provider::{EmbeddingProvider, LLMProvider, LlmServiceProfiles, NoopEmbeddingProvider, NoopLLMProvider};
use tracing::info;
use vector_index::{EmbeddingIndex, InMemoryEmbeddingIndex, QdrantEmbeddingIndex};

use crate::core::app_state::AppState;
use crate::core::config::Config;
use crate::core::pipeline::PipelineRunner;
use crate::error_handler::AppError;

/// Builds every shared service, starts the scheduler's worker pool, and
/// serves the HTTP router until the process is killed.
pub async fn start() -> Result<(), AppError> {
    let config = Config::from_env()?;
    info!(bind_addr = %config.bind_addr, workers = config.workers, "starting coderadar");

    let storage = Arc::new(store::Storage::open(&config.database_url).map_err(|e| AppError::Http {
        status: axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        code: "STORE_OPEN_ERROR",
        message: e.to_string(),
    })?);

    let parsers = Arc::new(symbol_parser::ParserRegistry::new());
    let embedding_index = build_embedding_index(&config).await?;
    let (llm_provider, embedding_provider) = build_llm_providers(&config)?;
    let gate = quality_gate::QualityGateEngine::new(storage.clone());

    let runner = PipelineRunner::new(
        storage.clone(),
        parsers.clone(),
        embedding_index.clone(),
        embedding_provider.clone(),
        llm_provider.clone(),
        config.clone(),
    );
    let scheduler = job_scheduler::JobScheduler::new(runner, config.workers.max(1));
    let scheduler_handle = scheduler.clone();
    tokio::spawn(async move { scheduler_handle.run(config.workers.max(1)).await });

    let state = AppState {
        storage,
        scheduler,
        gate,
        parsers,
        embedding_index,
        embedding_provider,
        llm_provider,
        config: config.clone(),
    };

    let app = routes::router(state)
        .layer(axum::middleware::from_fn(middleware_layer::json_extractor::json_error_mapper));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await.map_err(AppError::Bind)?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await.map_err(AppError::Server)
}

/// `QDRANT_URL` is not one of §6's named environment variables -- when
/// unset, embeddings are served from the in-process index rather than
/// failing startup, the same non-fatal-degradation posture as `LLM_KIND`.
async fn build_embedding_index(config: &Config) -> Result<Arc<dyn EmbeddingIndex>, AppError> {
    let Ok(url) = std::env::var("QDRANT_URL") else {
        return Ok(Arc::new(InMemoryEmbeddingIndex::new()));
    };
    let api_key = std::env::var("QDRANT_API_KEY").ok();
    let collection = std::env::var("QDRANT_COLLECTION").unwrap_or_else(|_| "coderadar-symbols".to_string());

    let index = QdrantEmbeddingIndex::new(&url, api_key.as_deref(), &collection, config.vector_dim)
        .map_err(|e| AppError::Http { status: axum::http::StatusCode::BAD_GATEWAY, code: "QDRANT_ERROR", message: e.to_string() })?;
    index.ensure_collection().await.map_err(|e| AppError::Http {
        status: axum::http::StatusCode::BAD_GATEWAY,
        code: "QDRANT_ERROR",
        message: e.to_string(),
    })?;
    Ok(Arc::new(index))
}

/// `LLM_KIND` opts into a real backend (`ollama` or `openai`, configured
/// the way `llm_provider::config::default_config` reads it from the
/// environment); unset or unrecognised falls back to the noop providers
/// since LLM-assisted smell detection is allowed to degrade (§4.H.2).
fn build_llm_providers(config: &Config) -> Result<(Arc<dyn LLMProvider>, Arc<dyn EmbeddingProvider>), AppError> {
    let llm_err = |e: llm_provider::LlmError| AppError::Http {
        status: axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        code: "LLM_CONFIG_ERROR",
        message: e.to_string(),
    };

    match config.llm_kind.as_deref() {
        Some("ollama") => {
            let fast = default_config::config_ollama_fast().map_err(llm_err)?;
            let slow = default_config::config_ollama_slow().map_err(llm_err)?;
            let embedding = default_config::config_ollama_embedding().map_err(llm_err)?;
            let profiles = Arc::new(
                LlmServiceProfiles::new(fast, Some(slow), embedding, Some(config.provider_timeout_secs))
                    .map_err(llm_err)?,
            );
            let llm: Arc<dyn LLMProvider> = profiles.clone();
            let embed: Arc<dyn EmbeddingProvider> = profiles;
            Ok((llm, embed))
        }
        Some("openai") => {
            let fast = default_config::config_openai_fast().map_err(llm_err)?;
            let slow = default_config::config_openai_slow().map_err(llm_err)?;
            let embedding = default_config::config_openai_embedding().map_err(llm_err)?;
            let profiles = Arc::new(
                LlmServiceProfiles::new(fast, Some(slow), embedding, Some(config.provider_timeout_secs))
                    .map_err(llm_err)?,
            );
            let llm: Arc<dyn LLMProvider> = profiles.clone();
            let embed: Arc<dyn EmbeddingProvider> = profiles;
            Ok((llm, embed))
        }
        _ => {
            let llm: Arc<dyn LLMProvider> = Arc::new(NoopLLMProvider);
            let embed: Arc<dyn EmbeddingProvider> = Arc::new(NoopEmbeddingProvider::new(config.vector_dim));
            Ok((llm, embed))
        }
    }
}
