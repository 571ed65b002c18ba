//! Path and directory management.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix of the in-flight sibling of an archive file.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Archive path for a page: `<dir>/<page>_page.zip`.
pub fn page_archive_path(dir: &Path, page: u32) -> PathBuf {
    dir.join(format!("{}_page.zip", page))
}

/// Temp sibling of `path` (`<path>.tmp`).
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Remove a file, treating "already gone" as success.
///
/// Returns whether a file was removed.
pub async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Remove a file and ignore any failure.
pub async fn remove_quietly(path: &Path) {
    if let Err(e) = remove_if_exists(path).await {
        tracing::debug!("Could not remove {}: {}", path.display(), e);
    }
}
