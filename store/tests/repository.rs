//! Cross-module store behaviour that doesn't fit a single `src` file's
//! `#[cfg(test)]` module: the public `Storage` surface end to end.

use domain::{RepoSource, RepositorySpec, RepositoryStatus};
use store::{Storage, StoreError};

fn spec(origin_url: &str, branch: &str) -> RepositorySpec {
    RepositorySpec {
        source: RepoSource::Remote,
        origin_url: Some(origin_url.to_string()),
        branch: Some(branch.to_string()),
        archive_path: None,
    }
}

/// S4: a second submit with the same `(origin_url, branch)` is rejected;
/// the first repository is left untouched.
#[test]
fn scenario_s4_duplicate_remote_submission_is_rejected() {
    let storage = Storage::open_in_memory().unwrap();

    let first = storage.create_repository(spec("https://example.com/acme/widgets", "main")).unwrap();

    let err = storage
        .create_repository(spec("https://example.com/acme/widgets", "main"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { .. }));

    let repo = storage.get_repository(first).unwrap();
    assert_eq!(repo.status, RepositoryStatus::Pending);
    assert_eq!(repo.origin_url.as_deref(), Some("https://example.com/acme/widgets"));
}

/// Same URL on a different branch is a distinct repository.
#[test]
fn different_branch_is_not_a_duplicate() {
    let storage = Storage::open_in_memory().unwrap();
    storage.create_repository(spec("https://example.com/acme/widgets", "main")).unwrap();
    let second = storage.create_repository(spec("https://example.com/acme/widgets", "develop"));
    assert!(second.is_ok());
}

/// §3 invariant 5: a completed repository's persisted counts match what
/// was actually inserted, and re-ingest (§3 Lifecycle) atomically replaces
/// the prior file set rather than appending to it.
#[test]
fn completed_repo_counts_match_persisted_rows_and_reingest_replaces() {
    let storage = Storage::open_in_memory().unwrap();
    let repo_id = storage.create_repository(spec("https://example.com/acme/counts", "main")).unwrap();

    let file = |path: &str| domain::FileIngest {
        new_file: domain::NewFile {
            path: path.to_string(),
            language: Some(domain::Language::C),
            byte_size: 42,
            line_count: 3,
            sha256: "deadbeef".to_string(),
        },
        content: b"int main() { return 0; }".to_vec(),
        symbols: Vec::new(),
        imports: Vec::new(),
        parse_error: None,
    };

    let outcome = storage.replace_ingest(repo_id, vec![file("src/lib.c")]).unwrap();
    assert_eq!(outcome.file_count, 1);
    storage
        .update_repository_status(repo_id, RepositoryStatus::Completed, Some((outcome.file_count, outcome.symbol_count)), None)
        .unwrap();

    let repo = storage.get_repository(repo_id).unwrap();
    assert_eq!(repo.status, RepositoryStatus::Completed);
    assert_eq!(repo.file_count, 1);
    let on_disk = storage.list_files(repo_id).unwrap();
    assert_eq!(on_disk.len(), repo.file_count as usize);

    // Re-ingest with a different file set replaces rather than appends.
    let outcome2 = storage.replace_ingest(repo_id, vec![file("src/main.c"), file("src/util.c")]).unwrap();
    assert_eq!(outcome2.file_count, 2);
    let on_disk2 = storage.list_files(repo_id).unwrap();
    assert_eq!(on_disk2.len(), 2);
    assert!(on_disk2.iter().all(|f| f.path != "src/lib.c"));
}
