//! Cross-crate S7 scenario (spec §8): `QualityGateEngine::check` reads real
//! store state rather than a hand-built `MetricsSnapshot`.

use std::sync::Arc;

use domain::{
    Confidence, FileId, Language, NewFile, NewVulnerability, RepoSource, RepositorySpec,
    RepositoryStatus, Severity, TriggeredBy,
};
use quality_gate::QualityGateEngine;
use store::Storage;

fn seed_repo_with_one_critical_vuln(storage: &Storage) -> domain::RepoId {
    let repo_id = storage
        .create_repository(RepositorySpec {
            source: RepoSource::Remote,
            origin_url: Some("https://example.com/acme/gate".to_string()),
            branch: Some("main".to_string()),
            archive_path: None,
        })
        .unwrap();

    let file = domain::FileIngest {
        new_file: NewFile {
            path: "src/lib.c".to_string(),
            language: Some(Language::C),
            byte_size: 10,
            line_count: 10,
            sha256: "abc".to_string(),
        },
        content: b"int main() { return 0; }".to_vec(),
        symbols: Vec::new(),
        imports: Vec::new(),
        parse_error: None,
    };
    let outcome = storage.replace_ingest(repo_id, vec![file]).unwrap();
    storage
        .update_repository_status(
            repo_id,
            RepositoryStatus::Completed,
            Some((outcome.file_count, outcome.symbol_count)),
            None,
        )
        .unwrap();

    storage
        .insert_vulnerabilities(
            repo_id,
            &[NewVulnerability {
                file_id: FileId(1),
                line: 3,
                rule_id: "HARDCODED_SECRET".to_string(),
                severity: Severity::Critical,
                cwe: Some("CWE-798".to_string()),
                category: "secrets".to_string(),
                description: "hardcoded API key".to_string(),
                confidence: Confidence::High,
                code_snippet: "key = \"sk-live-...\"".to_string(),
            }],
        )
        .unwrap();

    repo_id
}

/// S7: `{max_critical_vulns=0, min_quality_score=70}` against a repo with
/// one critical vulnerability -> `passed=false`, `block_merge=true`, and
/// both the failing check and the (still-passing) score check are present.
#[test]
fn scenario_s7_gate_check_against_real_store() {
    let storage = Arc::new(Storage::open_in_memory().unwrap());
    let repo_id = seed_repo_with_one_critical_vuln(&storage);

    let engine = QualityGateEngine::new(storage.clone());
    let mut config = engine.get_config(repo_id).unwrap();
    config.max_critical_vulnerabilities = 0;
    config.min_quality_score = 70.0;
    config.block_on_failure = true;
    engine.put_config(&config).unwrap();

    let result = engine.check(repo_id, Some("main"), None, None, TriggeredBy::Manual).unwrap();

    assert!(!result.passed);
    assert!(result.block_merge);
    let critical = result.checks.iter().find(|c| c.name == "max_critical_vulnerabilities").unwrap();
    assert!(!critical.passed);
    let score = result.checks.iter().find(|c| c.name == "min_quality_score").unwrap();
    assert!(score.passed, "one critical vuln alone shouldn't also sink a near-perfect score");

    let run = engine.get_run(result.run_id).unwrap();
    assert_eq!(run.status, domain::RunStatus::Failed);

    let history = engine.history(repo_id).unwrap();
    assert_eq!(history.len(), 1);
}

/// A repo with no findings passes every threshold and never blocks.
#[test]
fn clean_repo_passes_the_gate() {
    let storage = Arc::new(Storage::open_in_memory().unwrap());
    let repo_id = storage
        .create_repository(RepositorySpec {
            source: RepoSource::Remote,
            origin_url: Some("https://example.com/acme/clean".to_string()),
            branch: Some("main".to_string()),
            archive_path: None,
        })
        .unwrap();
    storage.update_repository_status(repo_id, RepositoryStatus::Completed, Some((0, 0)), None).unwrap();

    let engine = QualityGateEngine::new(storage.clone());
    let result = engine.check(repo_id, None, None, None, TriggeredBy::Manual).unwrap();

    assert!(result.passed);
    assert!(!result.block_merge);
    assert_eq!(result.quality_score, 100.0);
}
