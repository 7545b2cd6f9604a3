//! Import graph (§4.F.5): the same resolution, dead-file, and cycle
//! analysis as the call graph, applied to `File`/`ImportEdge` instead of
//! `Symbol`/`CallEdge`.

use std::collections::HashMap;

use domain::{File, FileId, ImportEdge, Language};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::cycles::CycleSeverity;

pub fn resolve_imports(files: &[File], edges: &[ImportEdge]) -> Vec<ImportEdge> {
    let mut by_path: HashMap<(domain::RepoId, String), FileId> = HashMap::new();
    let mut by_basename: HashMap<(domain::RepoId, String), FileId> = HashMap::new();
    let mut by_stem: HashMap<(domain::RepoId, String), FileId> = HashMap::new();
    for f in files {
        let base = basename(&normalize(&f.path));
        by_path.insert((f.repo_id, normalize(&f.path)), f.id);
        by_stem.insert((f.repo_id, stem(&base).to_string()), f.id);
        by_basename.insert((f.repo_id, base), f.id);
    }

    edges
        .iter()
        .cloned()
        .map(|mut e| {
            if e.to_file_id.is_none() {
                if let Some(from_file) = files.iter().find(|f| f.id == e.from_file_id) {
                    let language = from_file.language.unwrap_or(Language::Python);
                    match module_to_candidate(language, &e.to_module_name) {
                        Candidate::Path(path) => {
                            if let Some(&id) = by_path.get(&(from_file.repo_id, path)) {
                                e.to_file_id = Some(id);
                            }
                        }
                        Candidate::Basename(name) => {
                            if let Some(&id) = by_basename.get(&(from_file.repo_id, name)) {
                                e.to_file_id = Some(id);
                            }
                        }
                        Candidate::Stem(name) => {
                            if let Some(&id) = by_stem.get(&(from_file.repo_id, name)) {
                                e.to_file_id = Some(id);
                            }
                        }
                    }
                }
            }
            e
        })
        .collect()
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").to_string()
}

fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

fn stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

enum Candidate {
    /// A full repo-relative path, e.g. a Python module resolved from its
    /// dotted name.
    Path(String),
    /// A full file basename, extension included: a C `#include` or an
    /// Assembly `%include` names its target this way.
    Basename(String),
    /// A bare copybook name with no extension, as COBOL `COPY` gives it —
    /// matched against every file's basename with its extension stripped.
    Stem(String),
}

/// Each language's import statement names its target in its own idiom
/// (§4.F.5): a Python module path, a C/Assembly filename (already
/// carrying an extension), or a bare COBOL copybook name (no extension).
fn module_to_candidate(language: Language, module: &str) -> Candidate {
    match language {
        Language::Python => Candidate::Path(format!("{}.py", module.replace('.', "/"))),
        Language::C | Language::Assembly => Candidate::Basename(module.to_string()),
        Language::Cobol => Candidate::Stem(stem(module).to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct FileCycle {
    pub members: Vec<FileId>,
    pub severity: CycleSeverity,
}

pub fn find_import_cycles(files: &[File], edges: &[ImportEdge]) -> Vec<FileCycle> {
    let mut graph: DiGraph<FileId, ()> = DiGraph::new();
    let mut node_of: HashMap<FileId, NodeIndex> = HashMap::new();
    for f in files {
        node_of.insert(f.id, graph.add_node(f.id));
    }
    for e in edges {
        let Some(to) = e.to_file_id else { continue };
        let (Some(&from_idx), Some(&to_idx)) = (node_of.get(&e.from_file_id), node_of.get(&to)) else {
            continue;
        };
        graph.add_edge(from_idx, to_idx, ());
    }

    let mut cycles = Vec::new();
    for scc in tarjan_scc(&graph) {
        if scc.len() >= 2 {
            let mut members: Vec<FileId> = scc.iter().map(|&idx| graph[idx]).collect();
            members.sort();
            let severity = match members.len() {
                2 => CycleSeverity::Medium,
                3..=4 => CycleSeverity::High,
                _ => CycleSeverity::Critical,
            };
            cycles.push(FileCycle { members, severity });
        }
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ImportKind, RepoId};

    fn file(id: i64, path: &str, language: Language) -> File {
        File {
            id: FileId(id),
            repo_id: RepoId(1),
            path: path.to_string(),
            language: Some(language),
            byte_size: 0,
            line_count: 0,
            sha256: String::new(),
        }
    }

    fn import(from: i64, module: &str) -> ImportEdge {
        ImportEdge {
            from_file_id: FileId(from),
            to_file_id: None,
            to_module_name: module.to_string(),
            kind: ImportKind::File,
        }
    }

    #[test]
    fn c_include_resolves_by_basename_with_extension() {
        let files = vec![file(1, "src/main.c", Language::C), file(2, "include/stdio.h", Language::C)];
        let edges = vec![import(1, "stdio.h")];
        let resolved = resolve_imports(&files, &edges);
        assert_eq!(resolved[0].to_file_id, Some(FileId(2)));
    }

    #[test]
    fn asm_include_resolves_by_basename_with_extension() {
        let files = vec![file(1, "boot.s", Language::Assembly), file(2, "lib/macros.inc", Language::Assembly)];
        let edges = vec![import(1, "macros.inc")];
        let resolved = resolve_imports(&files, &edges);
        assert_eq!(resolved[0].to_file_id, Some(FileId(2)));
    }

    #[test]
    fn cobol_copy_resolves_by_stem_ignoring_extension() {
        let files = vec![file(1, "main.cbl", Language::Cobol), file(2, "copybooks/CUSTREC.cob", Language::Cobol)];
        let edges = vec![import(1, "CUSTREC")];
        let resolved = resolve_imports(&files, &edges);
        assert_eq!(resolved[0].to_file_id, Some(FileId(2)));
    }

    #[test]
    fn python_import_resolves_by_dotted_path() {
        let files = vec![file(1, "pkg/main.py", Language::Python), file(2, "pkg/utils.py", Language::Python)];
        let edges = vec![import(1, "pkg.utils")];
        let resolved = resolve_imports(&files, &edges);
        assert_eq!(resolved[0].to_file_id, Some(FileId(2)));
    }

    #[test]
    fn c_include_does_not_get_mistaken_for_a_python_module() {
        let files = vec![file(1, "src/main.c", Language::C)];
        let edges = vec![import(1, "stdio.h")];
        let resolved = resolve_imports(&files, &edges);
        assert_eq!(resolved[0].to_file_id, None);
    }
}
