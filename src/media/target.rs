//! Transfer targets: which items go into which archive file.

use std::path::{Path, PathBuf};

use crate::fs::paths::{page_archive_path, temp_path};

/// A set of item identifiers and the archive file they are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTarget {
    pub page: u32,
    pub ids: Vec<String>,
    pub dest: PathBuf,
}

impl TransferTarget {
    pub fn new(page: u32, ids: Vec<String>, dest: PathBuf) -> Self {
        Self { page, ids, dest }
    }

    /// Target for a page archive inside `dir`.
    pub fn for_page(page: u32, ids: Vec<String>, dir: &Path) -> Self {
        Self::new(page, ids, page_archive_path(dir, page))
    }

    /// Sibling path used while the transfer is in flight.
    pub fn temp_path(&self) -> PathBuf {
        temp_path(&self.dest)
    }
}
