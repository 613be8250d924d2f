//! Zip reading and overlay extraction

use crate::error::FetchError;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use zip::ZipArchive;

/// One file read out of a bundle archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the bundle root
    pub path: PathBuf,
    pub contents: Vec<u8>,
    /// Unix permission bits, when the archive recorded them
    pub mode: Option<u32>,
}

/// Read every file of a bundle archive into memory
///
/// The archive stores files under `{bundle_name}/`; that prefix is stripped.
/// Entries that would land outside the destination are rejected.
pub fn read_archive(zip_bytes: &[u8], bundle_name: &str) -> Result<Vec<ArchiveEntry>, FetchError> {
    let archive_err = |source| FetchError::Archive {
        bundle: bundle_name.to_string(),
        source,
    };

    let mut archive = ZipArchive::new(Cursor::new(zip_bytes)).map_err(archive_err)?;
    let prefix = Path::new(bundle_name);
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(archive_err)?;

        // Skip directories, they are created on demand
        if file.is_dir() {
            continue;
        }

        let enclosed = file.enclosed_name().ok_or_else(|| FetchError::UnsafeEntry {
            entry: file.name().to_string(),
        })?;

        let relative = enclosed
            .strip_prefix(prefix)
            .map(Path::to_path_buf)
            .unwrap_or(enclosed);

        if relative.as_os_str().is_empty() {
            continue;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| archive_err(zip::result::ZipError::Io(e)))?;

        entries.push(ArchiveEntry {
            path: relative,
            contents,
            mode: file.unix_mode(),
        });
    }

    Ok(entries)
}

/// Write entries below `destination`, replacing files that already exist
pub async fn write_entries(
    destination: &Path,
    entries: &[ArchiveEntry],
) -> Result<Vec<PathBuf>, FetchError> {
    let mut written = Vec::with_capacity(entries.len());

    for entry in entries {
        let target_path = destination.join(&entry.path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| FetchError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::write(&target_path, &entry.contents)
            .await
            .map_err(|source| FetchError::Write {
                path: target_path.clone(),
                source,
            })?;

        #[cfg(unix)]
        if let Some(mode) = entry.mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target_path, std::fs::Permissions::from_mode(mode & 0o777))
                .await
                .map_err(|source| FetchError::Write {
                    path: target_path.clone(),
                    source,
                })?;
        }

        debug!(path = %entry.path.display(), "extracted");
        written.push(entry.path.clone());
    }

    Ok(written)
}
