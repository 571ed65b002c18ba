//! Download state tracking.

use std::path::Path;

use crate::error::Error;
use crate::media::TransferTarget;

/// On-disk state of one transfer target, recovered from the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    /// Neither the archive nor its temp sibling exists.
    Absent,
    /// A temp sibling was left behind by an interrupted transfer.
    PartialTemp { has_final: bool },
    /// The archive exists with no temp sibling.
    Complete,
}

impl DownloadState {
    /// Inspect the filesystem for `target`.
    pub async fn inspect(target: &TransferTarget) -> Self {
        let has_final = exists(&target.dest).await;
        let has_temp = exists(&target.temp_path()).await;

        match (has_final, has_temp) {
            (_, true) => DownloadState::PartialTemp { has_final },
            (true, false) => DownloadState::Complete,
            (false, false) => DownloadState::Absent,
        }
    }

    /// Whether an archive file sits at the destination path.
    pub fn has_final(&self) -> bool {
        matches!(
            self,
            DownloadState::Complete | DownloadState::PartialTemp { has_final: true }
        )
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Statistics across one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub pages_listed: u64,
    pub items_listed: u64,
    pub pages_verified: u64,
    pub pages_downloaded: u64,
    pub pages_skipped: u64,
    pub bytes_downloaded: u64,
    pub failures: Vec<PageFailure>,
}

/// A page whose archive could not be produced.
#[derive(Debug, Clone)]
pub struct PageFailure {
    pub page: u32,
    pub path: String,
    pub reason: String,
}

impl RunStats {
    /// Record an archive that was already present and trusted.
    pub fn record_verified(&mut self) {
        self.pages_verified += 1;
    }

    /// Record a freshly downloaded archive.
    pub fn record_downloaded(&mut self, bytes: u64) {
        self.pages_downloaded += 1;
        self.bytes_downloaded += bytes;
    }

    /// Record a page that had nothing to download.
    pub fn record_skipped(&mut self) {
        self.pages_skipped += 1;
    }

    /// Record a page-scoped failure.
    pub fn record_failure(&mut self, target: &TransferTarget, error: &Error) {
        self.failures.push(PageFailure {
            page: target.page,
            path: target.dest.display().to_string(),
            reason: error.to_string(),
        });
    }

    pub fn pages_failed(&self) -> u64 {
        self.failures.len() as u64
    }

    /// Pages whose archive is in place after the run.
    pub fn pages_complete(&self) -> u64 {
        self.pages_verified + self.pages_downloaded
    }
}
