//! Cross-file duplication detection (§4.G): tokenize, shingle, sketch with
//! MinHash, pair files above a similarity threshold, then confirm with an
//! exact longest-common-run check to produce reportable line ranges.

mod lcs;
mod minhash;
mod shingle;
mod tokenize;

pub use minhash::{DEFAULT_H, estimate_similarity};
pub use shingle::DEFAULT_K;

use domain::{FileId, LineRange, NewDuplicationPair};

pub struct FileSource<'a> {
    pub file_id: FileId,
    pub content: &'a str,
}

pub struct DuplicationConfig {
    pub k: usize,
    pub h: usize,
    pub min_similarity: f64,
}

impl Default for DuplicationConfig {
    fn default() -> Self {
        Self { k: shingle::DEFAULT_K, h: minhash::DEFAULT_H, min_similarity: 0.8 }
    }
}

pub fn detect_duplicates(files: &[FileSource], config: &DuplicationConfig) -> Vec<NewDuplicationPair> {
    let tokenized: Vec<_> = files.iter().map(|f| tokenize::tokenize(f.content)).collect();
    let sketches: Vec<_> = tokenized
        .iter()
        .map(|tokens| {
            let keys: Vec<String> =
                shingle::shingles(tokens, config.k).into_iter().map(|s| s.key).collect();
            minhash::sketch(&keys, config.h)
        })
        .collect();

    let mut pairs = Vec::new();
    for i in 0..files.len() {
        for j in (i + 1)..files.len() {
            let similarity = minhash::estimate_similarity(&sketches[i], &sketches[j]);
            if similarity < config.min_similarity {
                continue;
            }
            let Some(run) = lcs::longest_common_run(&tokenized[i], &tokenized[j]) else { continue };
            pairs.push(NewDuplicationPair::canonical(
                files[i].file_id,
                LineRange { start: run.a_range.0, end: run.a_range.1 },
                files[j].file_id,
                LineRange { start: run.b_range.0, end: run.b_range.1 },
                similarity,
                run.a_range.1.saturating_sub(run.a_range.0) + 1,
                run.token_count,
            ));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_identical_files_are_flagged() {
        let content_a = "def add(a, b):\n    return a + b\n".repeat(3);
        let content_b = content_a.clone();
        let files = vec![
            FileSource { file_id: FileId(2), content: &content_a },
            FileSource { file_id: FileId(1), content: &content_b },
        ];
        let pairs = detect_duplicates(&files, &DuplicationConfig { k: 5, ..Default::default() });
        assert_eq!(pairs.len(), 1);
        // Canonical ordering: file1_id is always the smaller id.
        assert_eq!(pairs[0].file1_id, FileId(1));
        assert_eq!(pairs[0].file2_id, FileId(2));
    }

    #[test]
    fn dissimilar_files_are_not_flagged() {
        let files = vec![
            FileSource { file_id: FileId(1), content: "def add(a, b):\n    return a + b\n" },
            FileSource { file_id: FileId(2), content: "class Widget:\n    pass\n" },
        ];
        let pairs = detect_duplicates(&files, &DuplicationConfig::default());
        assert!(pairs.is_empty());
    }
}
