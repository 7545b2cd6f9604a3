//! Wires the job-scheduler's fixed phase sequence (Ingest -> Parse ->
//! {Metrics, CallGraph, Embed, Duplication, Vulns}) to the analysis crates
//! and the store. One `PipelineRunner` is shared across all scheduler
//! workers for the process's lifetime.
//!
//! `Task` carries no payload (just `repo_id`/`kind`/`priority`/`attempt`),
//! so the one piece of state that has to cross the Ingest -> Parse boundary
//! -- the fetched `ScratchDir` -- is kept in `scratch`, keyed by repo id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use domain::{FileIngest, Language, NewFile, RepoId, RepoSource, RepositoryStatus, SymbolFilter, SymbolIngest};
use job_scheduler::{Task, TaskFailure, TaskKind, TaskRunner};
use llm_provider::LLMProvider;
use source_fetcher::FetchError;
use store::StoreError;
use vector_index::{EmbeddingIndex, EmbeddingInput, EmbeddingProvider, embed_normalized, embedding_text};

use crate::core::config::Config;

pub struct PipelineRunner {
    storage: Arc<store::Storage>,
    parsers: Arc<symbol_parser::ParserRegistry>,
    embedding_index: Arc<dyn EmbeddingIndex>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    llm_provider: Arc<dyn LLMProvider>,
    config: Config,
    scratch: Mutex<HashMap<RepoId, source_fetcher::ScratchDir>>,
}

impl PipelineRunner {
    pub fn new(
        storage: Arc<store::Storage>,
        parsers: Arc<symbol_parser::ParserRegistry>,
        embedding_index: Arc<dyn EmbeddingIndex>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LLMProvider>,
        config: Config,
    ) -> Self {
        Self {
            storage,
            parsers,
            embedding_index,
            embedding_provider,
            llm_provider,
            config,
            scratch: Mutex::new(HashMap::new()),
        }
    }

    fn fail_repo(&self, repo_id: RepoId, reason: &str) {
        if let Err(e) =
            self.storage.update_repository_status(repo_id, RepositoryStatus::Failed, None, Some(reason))
        {
            warn!(repo_id = repo_id.get(), error = %e, "failed to record repository failure");
        }
    }

    /// Validation-shaped fetch errors (bad branch, unsafe archive entry,
    /// size cap) can't be fixed by retrying, so they terminate the
    /// repository immediately. Transport errors (git/zip/io) are retried by
    /// the scheduler before anything is marked failed.
    fn classify_fetch_err(&self, repo_id: RepoId, e: FetchError) -> TaskFailure {
        match e {
            FetchError::BranchNotFound(_) | FetchError::UnsafeArchiveEntry(_) | FetchError::SizeCapExceeded { .. } => {
                self.fail_repo(repo_id, &e.to_string());
                TaskFailure::permanent(e.to_string())
            }
            FetchError::Git(_) | FetchError::Zip(_) | FetchError::Io(_) => TaskFailure::transient(e.to_string()),
        }
    }

    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_ingest(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let repo = self.storage.get_repository(repo_id).map_err(classify_store_err)?;
        self.storage
            .update_repository_status(repo_id, RepositoryStatus::Cloning, None, None)
            .map_err(classify_store_err)?;

        let scratch = match repo.source {
            RepoSource::Remote => {
                let Some(url) = repo.origin_url.clone() else {
                    self.fail_repo(repo_id, "remote repository missing origin_url");
                    return Err(TaskFailure::permanent("missing origin_url"));
                };
                let branch = repo.branch.clone().unwrap_or_else(|| "main".to_string());
                source_fetcher::fetch_remote(&url, &branch).map_err(|e| self.classify_fetch_err(repo_id, e))?
            }
            RepoSource::Upload => {
                let Some(archive_path) = repo.archive_path.clone() else {
                    self.fail_repo(repo_id, "uploaded repository missing archive_path");
                    return Err(TaskFailure::permanent("missing archive_path"));
                };
                source_fetcher::fetch_upload(Path::new(&archive_path), self.config.ingest_size_cap)
                    .map_err(|e| self.classify_fetch_err(repo_id, e))?
            }
        };

        self.scratch.lock().await.insert(repo_id, scratch);
        Ok(())
    }

    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_parse(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let scratch = self
            .scratch
            .lock()
            .await
            .remove(&repo_id)
            .ok_or_else(|| TaskFailure::permanent("no scratch directory staged for this repository"))?;

        let root = scratch.path().to_path_buf();
        let paths = walk_files(&root).map_err(|e| TaskFailure::transient(e.to_string()))?;

        let mut files = Vec::with_capacity(paths.len());
        let mut language_counts: HashMap<Language, usize> = HashMap::new();

        for abs in paths {
            let bytes = match fs::read(&abs) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %abs.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };

            let byte_size = bytes.len() as u64;
            let probe_len = bytes.len().min(512);
            if lang_detect::is_binary(byte_size, &bytes[..probe_len], lang_detect::DEFAULT_BINARY_THRESHOLD) {
                continue;
            }

            let rel_path = to_repo_relative_path(&root, &abs);
            let language = lang_detect::detect(&rel_path, &bytes[..probe_len]);
            let source = String::from_utf8_lossy(&bytes).into_owned();
            let line_count = source.lines().count() as i64;
            let sha256 = sha256_hex(&bytes);

            let (symbols, imports, parse_error) = match language {
                Some(lang) => match self.parsers.parse(lang, &source, &rel_path) {
                    Ok(parsed) => {
                        let new_symbols = metrics_analyzer::build_symbols(lang, &source, &parsed);
                        let symbols: Vec<SymbolIngest> = new_symbols
                            .into_iter()
                            .zip(parsed.symbols.iter())
                            .map(|(symbol, raw)| SymbolIngest { symbol, calls: raw.calls.clone() })
                            .collect();
                        *language_counts.entry(lang).or_insert(0) += 1;
                        (symbols, parsed.imports, None)
                    }
                    Err(e) => (Vec::new(), Vec::new(), Some(e.to_string())),
                },
                None => (Vec::new(), Vec::new(), None),
            };

            files.push(FileIngest {
                new_file: NewFile { path: rel_path, language, byte_size: byte_size as i64, line_count, sha256 },
                content: bytes,
                symbols,
                imports,
                parse_error,
            });
        }

        let outcome = self.storage.replace_ingest(repo_id, files).map_err(classify_store_err)?;

        if let Some((lang, _)) = language_counts.iter().max_by_key(|(_, count)| **count) {
            if let Err(e) = self.storage.set_primary_language(repo_id, lang.as_str()) {
                warn!(repo_id = repo_id.get(), error = %e, "failed to record primary language");
            }
        }

        if !outcome.failures.is_empty() {
            info!(repo_id = repo_id.get(), failures = outcome.failures.len(), "some files failed to parse");
        }

        self.storage
            .update_repository_status(
                repo_id,
                RepositoryStatus::Analyzing,
                Some((outcome.file_count, outcome.symbol_count)),
                None,
            )
            .map_err(classify_store_err)
    }

    /// Symbol metrics (complexity, MI, LOC) are computed inline during
    /// `run_parse` -- `replace_ingest` requires them on the `Symbol` row at
    /// insert time, so there's nothing left to compute here. This fan-out
    /// task is a cheap verification pass over what's already persisted.
    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_metrics(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let symbols = self
            .storage
            .list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })
            .map_err(classify_store_err)?;
        let total = symbols.len();
        let avg_complexity = if total == 0 {
            0.0
        } else {
            symbols.iter().map(|s| s.cyclomatic_complexity as f64).sum::<f64>() / total as f64
        };
        info!(repo_id = repo_id.get(), symbols = total, avg_complexity, "metrics summary");
        Ok(())
    }

    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_callgraph(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let symbols = self
            .storage
            .list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })
            .map_err(classify_store_err)?;
        let raw_edges = self.storage.list_call_edges(repo_id).map_err(classify_store_err)?;
        let files = self.storage.list_files(repo_id).map_err(classify_store_err)?;

        let report = callgraph::analyze(&symbols, &raw_edges, &files);
        self.storage.upsert_call_edges(&report.resolved_edges).map_err(classify_store_err)?;

        let import_edges = self.storage.list_import_edges(repo_id).map_err(classify_store_err)?;
        let resolved_imports = callgraph::resolve_imports(&files, &import_edges);
        self.storage.upsert_import_resolutions(&resolved_imports).map_err(classify_store_err)?;

        info!(
            repo_id = repo_id.get(),
            dead_code = report.dead_code.len(),
            cycles = report.cycles.len(),
            "call graph resolved"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_embed(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let symbols = self
            .storage
            .list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })
            .map_err(classify_store_err)?;
        let files = self.storage.list_files(repo_id).map_err(classify_store_err)?;
        let file_by_id: HashMap<_, _> = files.iter().map(|f| (f.id, f)).collect();

        let mut content_cache: HashMap<domain::FileId, String> = HashMap::new();

        for symbol in &symbols {
            let Some(file) = file_by_id.get(&symbol.file_id) else { continue };

            let content = match content_cache.get(&symbol.file_id) {
                Some(c) => c.clone(),
                None => {
                    let bytes =
                        self.storage.get_file_content(repo_id, &file.path).map_err(classify_store_err)?;
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    content_cache.insert(symbol.file_id, text.clone());
                    text
                }
            };

            let body = symbol_body(&content, symbol.line_start, symbol.line_end);
            let input = EmbeddingInput {
                name: &symbol.name,
                signature: &symbol.signature,
                docstring: symbol.docstring.as_deref(),
                body: &body,
            };
            let text = embedding_text(&input);

            let vector = embed_normalized(self.embedding_provider.as_ref(), &text)
                .await
                .map_err(|e| TaskFailure::transient(e.to_string()))?;

            self.embedding_index
                .upsert_with_metadata(symbol.id, vector.clone(), Some(repo_id), file.language)
                .await
                .map_err(|e| TaskFailure::transient(e.to_string()))?;

            self.storage
                .upsert_embedding(&domain::Embedding::new(symbol.id, vector))
                .map_err(classify_store_err)?;
        }
        Ok(())
    }

    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_duplication(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let files = self.storage.list_files(repo_id).map_err(classify_store_err)?;
        let mut contents = Vec::with_capacity(files.len());
        for file in &files {
            let bytes = self.storage.get_file_content(repo_id, &file.path).map_err(classify_store_err)?;
            contents.push(String::from_utf8_lossy(&bytes).into_owned());
        }

        let sources: Vec<dup_detect::FileSource> = files
            .iter()
            .zip(contents.iter())
            .map(|(file, content)| dup_detect::FileSource { file_id: file.id, content })
            .collect();

        let pairs = dup_detect::detect_duplicates(&sources, &dup_detect::DuplicationConfig::default());
        self.storage.insert_duplication_pairs(repo_id, &pairs).map_err(classify_store_err)
    }

    #[instrument(skip(self), fields(repo_id = repo_id.get()))]
    async fn run_vulns(&self, repo_id: RepoId) -> Result<(), TaskFailure> {
        let files = self.storage.list_files(repo_id).map_err(classify_store_err)?;
        let mut content_cache: HashMap<domain::FileId, String> = HashMap::new();
        let mut vulnerabilities = Vec::new();

        for file in &files {
            let bytes = self.storage.get_file_content(repo_id, &file.path).map_err(classify_store_err)?;
            let content = String::from_utf8_lossy(&bytes).into_owned();
            vulnerabilities.extend(vuln_scan::scan_file(file.id, &content));
            content_cache.insert(file.id, content);
        }
        self.storage.insert_vulnerabilities(repo_id, &vulnerabilities).map_err(classify_store_err)?;

        let symbols = self
            .storage
            .list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })
            .map_err(classify_store_err)?;
        let mut smells = Vec::new();
        for symbol in &symbols {
            let Some(content) = content_cache.get(&symbol.file_id) else { continue };
            let body = symbol_body(content, symbol.line_start, symbol.line_end);
            smells.extend(
                vuln_scan::detect_smells(
                    self.llm_provider.as_ref(),
                    symbol.file_id,
                    symbol.id,
                    &symbol.name,
                    &body,
                )
                .await,
            );
        }
        self.storage.insert_code_smells(repo_id, &smells).map_err(classify_store_err)
    }
}

#[async_trait]
impl TaskRunner for PipelineRunner {
    async fn run(&self, task: &Task) -> Result<(), TaskFailure> {
        match task.kind {
            TaskKind::Ingest => self.run_ingest(task.repo_id).await,
            TaskKind::Parse => self.run_parse(task.repo_id).await,
            TaskKind::Metrics => self.run_metrics(task.repo_id).await,
            TaskKind::CallGraph => self.run_callgraph(task.repo_id).await,
            TaskKind::Embed => self.run_embed(task.repo_id).await,
            TaskKind::Duplication => self.run_duplication(task.repo_id).await,
            TaskKind::Vulns => self.run_vulns(task.repo_id).await,
        }
    }

    async fn on_pipeline_complete(&self, repo_id: RepoId) {
        if let Err(e) =
            self.storage.update_repository_status(repo_id, RepositoryStatus::Completed, None, None)
        {
            warn!(repo_id = repo_id.get(), error = %e, "failed to mark repository completed");
        }
    }
}

fn classify_store_err(e: StoreError) -> TaskFailure {
    match e {
        StoreError::NotFound(_) | StoreError::Duplicate { .. } => TaskFailure::permanent(e.to_string()),
        StoreError::Sqlite(_) | StoreError::Pool(_) | StoreError::Serde(_) => TaskFailure::transient(e.to_string()),
    }
}

fn walk_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if entry.file_name() == ".git" {
                    continue;
                }
                stack.push(path);
            } else if file_type.is_file() {
                out.push(path);
            }
        }
    }
    Ok(out)
}

fn to_repo_relative_path(root: &Path, abs: &Path) -> String {
    let rel = abs.strip_prefix(root).unwrap_or(abs);
    rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect::<Vec<_>>().join("/")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Slices `source` down to one symbol's line range. Mirrors
/// `metrics_analyzer::symbol_body`, which is private to that crate.
fn symbol_body(source: &str, line_start: u32, line_end: u32) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let start = (line_start.saturating_sub(1) as usize).min(lines.len());
    let end = (line_end as usize).min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}
