use serde::{Deserialize, Serialize};

use crate::ids::{FileId, RepoId};

/// A line range, 1-based inclusive, within one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// `(file1_id, file2_id)` pairs are canonically ordered: `file1_id < file2_id`
/// (§4.G, §8 property 7). Constructing one out of order is a programmer
/// error in this crate, not a runtime one, so callers use `DuplicationPair::new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicationPair {
    pub id: i64,
    pub repo_id: RepoId,
    pub file1_id: FileId,
    pub file1_range: LineRange,
    pub file2_id: FileId,
    pub file2_range: LineRange,
    pub similarity: f64,
    pub duplicate_lines: u32,
    pub duplicate_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct NewDuplicationPair {
    pub file1_id: FileId,
    pub file1_range: LineRange,
    pub file2_id: FileId,
    pub file2_range: LineRange,
    pub similarity: f64,
    pub duplicate_lines: u32,
    pub duplicate_tokens: u32,
}

impl NewDuplicationPair {
    /// Builds a pair, swapping the two sides if needed so `file1_id` is
    /// always the smaller id — the canonical ordering invariant.
    pub fn canonical(
        a_id: FileId,
        a_range: LineRange,
        b_id: FileId,
        b_range: LineRange,
        similarity: f64,
        duplicate_lines: u32,
        duplicate_tokens: u32,
    ) -> Self {
        if a_id.get() <= b_id.get() {
            Self {
                file1_id: a_id,
                file1_range: a_range,
                file2_id: b_id,
                file2_range: b_range,
                similarity,
                duplicate_lines,
                duplicate_tokens,
            }
        } else {
            Self {
                file1_id: b_id,
                file1_range: b_range,
                file2_id: a_id,
                file2_range: a_range,
                similarity,
                duplicate_lines,
                duplicate_tokens,
            }
        }
    }
}
