use domain::{
    CallEdge, FileId, FileIngest, ImportEdge, ImportKind, Language, ParseFailure, RepoId,
    SymbolId,
};
use rusqlite::{OptionalExtension, params};

use crate::error::Result;
use crate::Storage;

fn lang_str(l: Option<Language>) -> Option<&'static str> {
    l.map(|l| l.as_str())
}

fn parse_lang(s: Option<String>) -> Option<Language> {
    match s.as_deref() {
        Some("python") => Some(Language::Python),
        Some("c") => Some(Language::C),
        Some("cobol") => Some(Language::Cobol),
        Some("assembly") => Some(Language::Assembly),
        _ => None,
    }
}

/// Outcome of one ingest-phase write: the parse-phase counts and any
/// per-file parse failures that were recorded rather than raised.
pub struct IngestOutcome {
    pub file_count: i64,
    pub symbol_count: i64,
    pub failures: Vec<ParseFailure>,
}

impl Storage {
    /// Replaces all files/symbols/edges for `repo_id` with `files`, in one
    /// transaction (the "delete-in-transaction" re-ingest strategy named in
    /// §3's Lifecycle paragraph). Symbol-to-symbol call resolution is not
    /// performed here — `CallGraphBuilder` runs as a follow-up phase and
    /// writes resolved `to_symbol_id`s via `upsert_call_edges`.
    pub fn replace_ingest(&self, repo_id: RepoId, files: Vec<FileIngest>) -> Result<IngestOutcome> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        clear_repo_children(&tx, repo_id)?;

        let mut file_count = 0i64;
        let mut symbol_count = 0i64;
        let mut failures = Vec::new();

        for f in files {
            tx.execute(
                "INSERT INTO files (repo_id, path, language, byte_size, line_count, sha256, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    repo_id.get(),
                    f.new_file.path,
                    lang_str(f.new_file.language),
                    f.new_file.byte_size,
                    f.new_file.line_count,
                    f.new_file.sha256,
                    f.content,
                ],
            )?;
            let file_id = FileId(tx.last_insert_rowid());
            file_count += 1;

            if let Some(message) = f.parse_error {
                tx.execute(
                    "INSERT INTO parse_failures (file_id, message) VALUES (?1, ?2)",
                    params![file_id.get(), message],
                )?;
                failures.push(ParseFailure { file_id, message });
                continue;
            }

            for imp in f.imports {
                tx.execute(
                    "INSERT INTO import_edges (from_file_id, to_file_id, to_module_name, kind)
                     VALUES (?1, NULL, ?2, ?3)",
                    params![file_id.get(), imp.module_name, "module"],
                )?;
            }

            for s in f.symbols {
                let sym = s.symbol;
                tx.execute(
                    "INSERT INTO symbols (file_id, name, kind, line_start, line_end, signature,
                        docstring, has_docstring, docstring_length, cyclomatic_complexity,
                        maintainability_index, mi_approximated, loc, comment_lines, blank_lines)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        file_id.get(),
                        sym.name,
                        kind_str(sym.kind),
                        sym.line_start,
                        sym.line_end,
                        sym.signature,
                        sym.docstring,
                        sym.has_docstring() as i64,
                        sym.docstring_length(),
                        sym.cyclomatic_complexity,
                        sym.maintainability_index,
                        sym.mi_approximated as i64,
                        sym.loc,
                        sym.comment_lines,
                        sym.blank_lines,
                    ],
                )?;
                let symbol_id = SymbolId(tx.last_insert_rowid());
                symbol_count += 1;

                for call in s.calls {
                    tx.execute(
                        "INSERT INTO call_edges (from_symbol_id, to_name, to_symbol_id, file_id, line, is_external)
                         VALUES (?1, ?2, NULL, ?3, ?4, 0)",
                        params![symbol_id.get(), call.callee_name, file_id.get(), call.line],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(IngestOutcome { file_count, symbol_count, failures })
    }

    pub fn get_file_content(&self, repo_id: RepoId, path: &str) -> Result<Vec<u8>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT content FROM files WHERE repo_id = ?1 AND path = ?2",
            params![repo_id.get(), path],
            |row| row.get::<_, Option<Vec<u8>>>(0),
        )
        .optional()?
        .flatten()
        .ok_or_else(|| crate::error::StoreError::NotFound(format!("file {path}")))
    }

    pub fn list_files(&self, repo_id: RepoId) -> Result<Vec<domain::File>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, repo_id, path, language, byte_size, line_count, sha256
             FROM files WHERE repo_id = ?1 ORDER BY path",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            Ok(domain::File {
                id: FileId(row.get(0)?),
                repo_id: RepoId(row.get(1)?),
                path: row.get(2)?,
                language: parse_lang(row.get(3)?),
                byte_size: row.get(4)?,
                line_count: row.get(5)?,
                sha256: row.get(6)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Writes back call-edge resolutions produced by `CallGraphBuilder`.
    pub fn upsert_call_edges(&self, edges: &[CallEdge]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for e in edges {
            tx.execute(
                "UPDATE call_edges SET to_symbol_id = ?1, is_external = ?2
                 WHERE from_symbol_id = ?3 AND to_name = ?4 AND line = ?5",
                params![
                    e.to_symbol_id.map(|id| id.get()),
                    e.is_external as i64,
                    e.from_symbol_id.get(),
                    e.to_name,
                    e.line,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_call_edges(&self, repo_id: RepoId) -> Result<Vec<CallEdge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT ce.from_symbol_id, ce.to_name, ce.to_symbol_id, ce.file_id, ce.line, ce.is_external
             FROM call_edges ce JOIN files f ON f.id = ce.file_id
             WHERE f.repo_id = ?1",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            Ok(CallEdge {
                from_symbol_id: SymbolId(row.get(0)?),
                to_name: row.get(1)?,
                to_symbol_id: row.get::<_, Option<i64>>(2)?.map(SymbolId),
                file_id: FileId(row.get(3)?),
                line: row.get(4)?,
                is_external: row.get::<_, i64>(5)? != 0,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn upsert_import_resolutions(&self, edges: &[ImportEdge]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for e in edges {
            tx.execute(
                "UPDATE import_edges SET to_file_id = ?1, kind = ?2
                 WHERE from_file_id = ?3 AND to_module_name = ?4",
                params![
                    e.to_file_id.map(|id| id.get()),
                    kind_str_import(e.kind),
                    e.from_file_id.get(),
                    e.to_module_name,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_import_edges(&self, repo_id: RepoId) -> Result<Vec<ImportEdge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT ie.from_file_id, ie.to_file_id, ie.to_module_name, ie.kind
             FROM import_edges ie JOIN files f ON f.id = ie.from_file_id
             WHERE f.repo_id = ?1",
        )?;
        let rows = stmt.query_map(params![repo_id.get()], |row| {
            Ok(ImportEdge {
                from_file_id: FileId(row.get(0)?),
                to_file_id: row.get::<_, Option<i64>>(1)?.map(FileId),
                to_module_name: row.get(2)?,
                kind: parse_import_kind(&row.get::<_, String>(3)?),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}

fn kind_str(k: domain::SymbolKind) -> &'static str {
    use domain::SymbolKind::*;
    match k {
        Function => "function",
        Class => "class",
        Method => "method",
        Variable => "variable",
        Procedure => "procedure",
    }
}

fn kind_str_import(k: ImportKind) -> &'static str {
    match k {
        ImportKind::Module => "module",
        ImportKind::File => "file",
    }
}

fn parse_import_kind(s: &str) -> ImportKind {
    match s {
        "file" => ImportKind::File,
        _ => ImportKind::Module,
    }
}

fn clear_repo_children(tx: &rusqlite::Transaction, repo_id: RepoId) -> Result<()> {
    tx.execute(
        "DELETE FROM call_edges WHERE file_id IN (SELECT id FROM files WHERE repo_id = ?1)",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM import_edges WHERE from_file_id IN (SELECT id FROM files WHERE repo_id = ?1)",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM embeddings WHERE symbol_id IN (
            SELECT s.id FROM symbols s JOIN files f ON f.id = s.file_id WHERE f.repo_id = ?1)",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM vulnerabilities WHERE repo_id = ?1",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM code_smells WHERE repo_id = ?1",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM duplication_pairs WHERE repo_id = ?1",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM parse_failures WHERE file_id IN (SELECT id FROM files WHERE repo_id = ?1)",
        params![repo_id.get()],
    )?;
    tx.execute(
        "DELETE FROM symbols WHERE file_id IN (SELECT id FROM files WHERE repo_id = ?1)",
        params![repo_id.get()],
    )?;
    tx.execute("DELETE FROM files WHERE repo_id = ?1", params![repo_id.get()])?;
    Ok(())
}
