//! DDL applied once per connection pool, not a migration framework —
//! schema migration across versions is an external collaborator (spec §1
//! Out of scope). This is the ambient bootstrap a concrete SQLite-backed
//! `Storage` needs to exist at all.

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS repositories (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    source          TEXT NOT NULL,
    origin_url      TEXT,
    branch          TEXT,
    archive_path    TEXT,
    status          TEXT NOT NULL,
    file_count      INTEGER NOT NULL DEFAULT 0,
    symbol_count    INTEGER NOT NULL DEFAULT 0,
    stars           INTEGER,
    primary_language TEXT,
    created_at      TEXT NOT NULL,
    failure_reason  TEXT,
    UNIQUE(origin_url, branch)
);

CREATE TABLE IF NOT EXISTS files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id     INTEGER NOT NULL REFERENCES repositories(id),
    path        TEXT NOT NULL,
    language    TEXT,
    byte_size   INTEGER NOT NULL,
    line_count  INTEGER NOT NULL,
    sha256      TEXT NOT NULL,
    content     BLOB,
    UNIQUE(repo_id, path)
);
CREATE INDEX IF NOT EXISTS idx_files_repo ON files(repo_id);

CREATE TABLE IF NOT EXISTS symbols (
    id                      INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id                 INTEGER NOT NULL REFERENCES files(id),
    name                    TEXT NOT NULL,
    kind                    TEXT NOT NULL,
    line_start              INTEGER NOT NULL,
    line_end                INTEGER NOT NULL,
    signature               TEXT NOT NULL,
    docstring               TEXT,
    has_docstring           INTEGER NOT NULL,
    docstring_length        INTEGER NOT NULL,
    cyclomatic_complexity   INTEGER NOT NULL,
    maintainability_index   REAL NOT NULL,
    mi_approximated         INTEGER NOT NULL,
    loc                     INTEGER NOT NULL,
    comment_lines           INTEGER NOT NULL,
    blank_lines             INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_symbols_file ON symbols(file_id);
CREATE INDEX IF NOT EXISTS idx_symbols_name ON symbols(name);

CREATE TABLE IF NOT EXISTS call_edges (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    from_symbol_id  INTEGER NOT NULL REFERENCES symbols(id),
    to_name         TEXT NOT NULL,
    to_symbol_id    INTEGER REFERENCES symbols(id),
    file_id         INTEGER NOT NULL REFERENCES files(id),
    line            INTEGER NOT NULL,
    is_external     INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_call_edges_from ON call_edges(from_symbol_id);
CREATE INDEX IF NOT EXISTS idx_call_edges_to ON call_edges(to_symbol_id);

CREATE TABLE IF NOT EXISTS import_edges (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    from_file_id    INTEGER NOT NULL REFERENCES files(id),
    to_file_id      INTEGER REFERENCES files(id),
    to_module_name  TEXT NOT NULL,
    kind            TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_import_edges_from ON import_edges(from_file_id);

CREATE TABLE IF NOT EXISTS parse_failures (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id     INTEGER NOT NULL REFERENCES files(id),
    message     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vulnerabilities (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id         INTEGER NOT NULL REFERENCES repositories(id),
    file_id         INTEGER NOT NULL REFERENCES files(id),
    line            INTEGER NOT NULL,
    rule_id         TEXT NOT NULL,
    severity        TEXT NOT NULL,
    cwe             TEXT,
    category        TEXT NOT NULL,
    description     TEXT NOT NULL,
    confidence      TEXT NOT NULL,
    code_snippet    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_vulns_repo ON vulnerabilities(repo_id);

CREATE TABLE IF NOT EXISTS code_smells (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id         INTEGER NOT NULL REFERENCES repositories(id),
    smell_type      TEXT NOT NULL,
    severity        TEXT NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    suggestion      TEXT NOT NULL,
    file_id         INTEGER NOT NULL REFERENCES files(id),
    symbol_id       INTEGER REFERENCES symbols(id),
    location        TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_smells_repo ON code_smells(repo_id);

CREATE TABLE IF NOT EXISTS duplication_pairs (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id             INTEGER NOT NULL REFERENCES repositories(id),
    file1_id            INTEGER NOT NULL REFERENCES files(id),
    file1_start         INTEGER NOT NULL,
    file1_end           INTEGER NOT NULL,
    file2_id            INTEGER NOT NULL REFERENCES files(id),
    file2_start         INTEGER NOT NULL,
    file2_end           INTEGER NOT NULL,
    similarity          REAL NOT NULL,
    duplicate_lines     INTEGER NOT NULL,
    duplicate_tokens    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_dup_repo ON duplication_pairs(repo_id);

CREATE TABLE IF NOT EXISTS embeddings (
    symbol_id   INTEGER PRIMARY KEY REFERENCES symbols(id),
    dim         INTEGER NOT NULL,
    vector      BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS quality_gate_configs (
    repo_id                         INTEGER PRIMARY KEY REFERENCES repositories(id),
    max_complexity                  INTEGER NOT NULL,
    max_code_smells                 INTEGER NOT NULL,
    max_critical_smells             INTEGER NOT NULL,
    max_vulnerabilities             INTEGER NOT NULL,
    max_critical_vulnerabilities     INTEGER NOT NULL,
    min_quality_score               REAL NOT NULL,
    max_duplication_percentage      REAL NOT NULL,
    block_on_failure                INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS cicd_runs (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id         INTEGER NOT NULL REFERENCES repositories(id),
    branch          TEXT,
    commit_sha      TEXT,
    pr_number       INTEGER,
    triggered_by    TEXT NOT NULL,
    status          TEXT NOT NULL,
    gate_result     TEXT,
    created_at      TEXT NOT NULL,
    completed_at    TEXT
);
CREATE INDEX IF NOT EXISTS idx_runs_repo ON cicd_runs(repo_id);
"#;

pub fn apply(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
