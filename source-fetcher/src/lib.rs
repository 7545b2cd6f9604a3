//! Fetches a Repository's source tree into a scratch directory (§4.B):
//! a shallow `git2` clone for remote repos, or a validated `zip` unpack for
//! uploads.

pub mod archive;
pub mod clone;
pub mod error;
pub mod scratch;

pub use error::{FetchError, Result};
pub use scratch::ScratchDir;

use std::path::Path;

/// Fetches a remote repository's `branch` into a fresh scratch directory.
/// Fails with `FetchError::BranchNotFound` if the branch doesn't exist on
/// the remote (§4.B).
pub fn fetch_remote(url: &str, branch: &str) -> Result<ScratchDir> {
    let scratch = ScratchDir::new()?;
    clone::clone_branch(url, branch, scratch.path())?;
    Ok(scratch)
}

/// Unpacks an uploaded archive into a fresh scratch directory, enforcing
/// `INGEST_SIZE_CAP` (bytes) against total uncompressed size.
pub fn fetch_upload(archive_path: &Path, size_cap: u64) -> Result<ScratchDir> {
    let scratch = ScratchDir::new()?;
    archive::unpack_zip(archive_path, scratch.path(), size_cap)?;
    Ok(scratch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_parent_traversal_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("evil.zip");
        let file = std::fs::File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file::<_, ()>("../../etc/passwd", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"pwned").unwrap();
        writer.finish().unwrap();

        let dest = dir.path().join("out");
        let err = archive::unpack_zip(&archive_path, &dest, 1024 * 1024).unwrap_err();
        assert!(matches!(err, FetchError::UnsafeArchiveEntry(_)));
    }

    #[test]
    fn enforces_size_cap() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("big.zip");
        let file = std::fs::File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file::<_, ()>("big.txt", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(&vec![0u8; 4096]).unwrap();
        writer.finish().unwrap();

        let dest = dir.path().join("out");
        let err = archive::unpack_zip(&archive_path, &dest, 1024).unwrap_err();
        assert!(matches!(err, FetchError::SizeCapExceeded { .. }));
    }
}
