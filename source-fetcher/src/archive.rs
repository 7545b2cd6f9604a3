//! Uploaded-archive unpacking (§4.B): rejects absolute paths, `..`
//! segments, symlink entries leaving the root, and total uncompressed size
//! over the configured cap.

use std::fs;
use std::io::Read;
use std::path::{Component, Path};

use tracing::{info, instrument, warn};
use zip::ZipArchive;

use crate::error::{FetchError, Result};

#[instrument(skip(archive_path, dest))]
pub fn unpack_zip(archive_path: &Path, dest: &Path, size_cap: u64) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut zip = ZipArchive::new(file)?;

    let mut total_uncompressed: u64 = 0;
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        total_uncompressed = total_uncompressed.saturating_add(entry.size());
        if total_uncompressed > size_cap {
            return Err(FetchError::SizeCapExceeded { actual: total_uncompressed, cap: size_cap });
        }
        validate_entry_name(entry.name())?;
        if entry.is_symlink() {
            return Err(FetchError::UnsafeArchiveEntry(format!(
                "symlink entry rejected: {}",
                entry.name()
            )));
        }
    }

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let rel_path = sanitized_path(entry.name())?;
        let out_path = dest.join(&rel_path);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        fs::write(&out_path, buf)?;
    }

    info!(path = %dest.display(), entries = zip.len(), "archive unpacked");
    Ok(())
}

fn validate_entry_name(name: &str) -> Result<()> {
    sanitized_path(name).map(|_| ())
}

/// Rejects absolute paths and `..` components; returns the relative path
/// safe to join under the extraction root.
fn sanitized_path(name: &str) -> Result<std::path::PathBuf> {
    let path = Path::new(name);
    if path.is_absolute() {
        warn!(%name, "rejecting absolute archive entry");
        return Err(FetchError::UnsafeArchiveEntry(format!("absolute path: {name}")));
    }
    let mut clean = std::path::PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                warn!(%name, "rejecting archive entry with '..' segment");
                return Err(FetchError::UnsafeArchiveEntry(format!("parent traversal: {name}")));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FetchError::UnsafeArchiveEntry(format!("absolute path: {name}")));
            }
        }
    }
    Ok(clean)
}
