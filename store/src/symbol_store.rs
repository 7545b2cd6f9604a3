use domain::{FileId, RepoId, Symbol, SymbolFilter, SymbolId, SymbolKind};
use rusqlite::{OptionalExtension, params};

use crate::error::{Result, StoreError};
use crate::Storage;

fn kind_str(k: SymbolKind) -> &'static str {
    match k {
        SymbolKind::Function => "function",
        SymbolKind::Class => "class",
        SymbolKind::Method => "method",
        SymbolKind::Variable => "variable",
        SymbolKind::Procedure => "procedure",
    }
}

fn parse_kind(s: &str) -> SymbolKind {
    match s {
        "class" => SymbolKind::Class,
        "method" => SymbolKind::Method,
        "variable" => SymbolKind::Variable,
        "procedure" => SymbolKind::Procedure,
        _ => SymbolKind::Function,
    }
}

fn row_to_symbol(row: &rusqlite::Row) -> rusqlite::Result<Symbol> {
    Ok(Symbol {
        id: SymbolId(row.get(0)?),
        file_id: FileId(row.get(1)?),
        name: row.get(2)?,
        kind: parse_kind(&row.get::<_, String>(3)?),
        line_start: row.get(4)?,
        line_end: row.get(5)?,
        signature: row.get(6)?,
        docstring: row.get(7)?,
        has_docstring: row.get::<_, i64>(8)? != 0,
        docstring_length: row.get(9)?,
        cyclomatic_complexity: row.get(10)?,
        maintainability_index: row.get(11)?,
        mi_approximated: row.get::<_, i64>(12)? != 0,
        loc: row.get(13)?,
        comment_lines: row.get(14)?,
        blank_lines: row.get(15)?,
    })
}

const SYMBOL_COLUMNS: &str = "s.id, s.file_id, s.name, s.kind, s.line_start, s.line_end, s.signature,
    s.docstring, s.has_docstring, s.docstring_length, s.cyclomatic_complexity,
    s.maintainability_index, s.mi_approximated, s.loc, s.comment_lines, s.blank_lines";

impl Storage {
    pub fn get_symbol(&self, id: SymbolId) -> Result<Symbol> {
        let conn = self.conn()?;
        let sql = format!("SELECT {SYMBOL_COLUMNS} FROM symbols s WHERE s.id = ?1");
        conn.query_row(&sql, params![id.get()], row_to_symbol)
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("symbol {id}")))
    }

    /// Reader that tolerates concurrent writers (§4.A): plain SELECT under
    /// WAL, no explicit locking needed.
    pub fn list_symbols(&self, filter: &SymbolFilter) -> Result<Vec<Symbol>> {
        let conn = self.conn()?;
        let mut sql = format!(
            "SELECT {SYMBOL_COLUMNS} FROM symbols s JOIN files f ON f.id = s.file_id WHERE 1=1"
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(repo_id) = filter.repo_id {
            sql.push_str(" AND f.repo_id = ?");
            args.push(Box::new(repo_id.get()));
        }
        if let Some(file_id) = filter.file_id {
            sql.push_str(" AND s.file_id = ?");
            args.push(Box::new(file_id.get()));
        }
        if let Some(kind) = filter.kind {
            sql.push_str(" AND s.kind = ?");
            args.push(Box::new(kind_str(kind)));
        }
        if let Some(needle) = &filter.name_contains {
            sql.push_str(" AND s.name LIKE ?");
            args.push(Box::new(format!("%{needle}%")));
        }
        sql.push_str(" ORDER BY s.id");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            args.push(Box::new(limit));
            if let Some(offset) = filter.offset {
                sql.push_str(" OFFSET ?");
                args.push(Box::new(offset));
            }
        }

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = args.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), row_to_symbol)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}
