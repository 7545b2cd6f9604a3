use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

/// A scratch directory exclusive to one ingest job (§5 Shared-resource
/// policy). Dropping it releases the directory on every exit path,
/// including panics unwinding through the caller — satisfying §4.B's
/// "temporary space is released on all exit paths".
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> std::io::Result<Self> {
        let dir = TempDir::with_prefix("coderadar-ingest-")?;
        debug!(path = %dir.path().display(), "scratch directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        debug!(path = %self.dir.path().display(), "releasing scratch directory");
    }
}
