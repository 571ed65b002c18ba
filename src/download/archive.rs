//! Archive fetching: turn one archive GET into a trustworthy file on disk.
//!
//! The server builds each zip on the fly, so byte ranges are not stable
//! between requests. A partial temp file is therefore never resumed: it is
//! deleted before every attempt, and the archive only appears at its final
//! path through a rename once the stream completed.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;

use crate::api::{ArchiveResponse, MediaSource};
use crate::download::observer::ProgressObserver;
use crate::download::retry::{RetryDecision, RetryPolicy};
use crate::download::state::DownloadState;
use crate::download::validate::{validate_existing, Validation};
use crate::error::{Error, Result};
use crate::fs::{remove_if_exists, remove_quietly};
use crate::media::TransferTarget;

/// Largest slice written (and reported) at once.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Longest wait for the next body chunk before the attempt is abandoned.
const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(30);

/// Successful result of [`ArchiveFetcher::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A trusted archive was already in place; nothing was transferred.
    AlreadyComplete { bytes: u64 },
    /// The archive was streamed and moved into place.
    Downloaded { bytes: u64 },
}

impl FetchOutcome {
    pub fn bytes(&self) -> u64 {
        match self {
            FetchOutcome::AlreadyComplete { bytes } | FetchOutcome::Downloaded { bytes } => *bytes,
        }
    }
}

/// Downloads page archives with validation, temp-file commits and retry.
pub struct ArchiveFetcher<'a> {
    source: &'a dyn MediaSource,
    policy: RetryPolicy,
    chunk_timeout: Duration,
}

impl<'a> ArchiveFetcher<'a> {
    pub fn new(source: &'a dyn MediaSource, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            chunk_timeout: DEFAULT_CHUNK_TIMEOUT,
        }
    }

    /// Override how long a stalled body may go without data.
    #[must_use]
    pub fn with_chunk_timeout(mut self, chunk_timeout: Duration) -> Self {
        self.chunk_timeout = chunk_timeout;
        self
    }

    /// Make sure `target.dest` holds the archive for `target.ids`.
    ///
    /// Transient transport faults are retried with backoff up to the policy's
    /// budget. A rejected request or any other error fails immediately. On
    /// every failure path the temp file is removed.
    pub async fn fetch(
        &self,
        target: &TransferTarget,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
    ) -> Result<FetchOutcome> {
        let result = self.fetch_inner(target, cancel, observer).await;
        if let Err(e) = &result {
            observer.transfer_failed(target, e);
        }
        result
    }

    async fn fetch_inner(
        &self,
        target: &TransferTarget,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
    ) -> Result<FetchOutcome> {
        let state = DownloadState::inspect(target).await;
        tracing::debug!("Page {} state before fetch: {:?}", target.page, state);

        // A leftover temp file never survives next to the final archive.
        if let DownloadState::PartialTemp { .. } = state {
            remove_if_exists(&target.temp_path()).await?;
        }

        if state.has_final() {
            match validate_existing(self.source, target).await {
                Validation::Trusted { bytes } => {
                    tracing::debug!(
                        "File already exists and is complete: {} ({} bytes)",
                        target.dest.display(),
                        bytes
                    );
                    observer.existing_verified(target, bytes);
                    return Ok(FetchOutcome::AlreadyComplete { bytes });
                }
                Validation::Stale { reason } => {
                    tracing::debug!(
                        "Discarding {}: {}, re-downloading",
                        target.dest.display(),
                        reason
                    );
                    observer.existing_discarded(target, &reason);
                    remove_quietly(&target.dest).await;
                }
            }
        }

        let temp = target.temp_path();
        let mut failures = 0u32;

        loop {
            if cancel.is_cancelled() {
                remove_quietly(&temp).await;
                return Err(Error::Cancelled);
            }

            // Never resume: the previous attempt's bytes belong to another zip.
            remove_if_exists(&temp).await?;

            observer.attempt_started(target, failures);
            tracing::debug!("Downloading to {}", target.dest.display());

            let error = match self.transfer(target, &temp, cancel, observer).await {
                Ok(bytes) => {
                    if let Err(e) = commit(&temp, &target.dest).await {
                        remove_quietly(&temp).await;
                        return Err(e);
                    }
                    tracing::debug!(
                        "Download completed: {} ({} bytes)",
                        target.dest.display(),
                        bytes
                    );
                    observer.transfer_finished(target, bytes);
                    return Ok(FetchOutcome::Downloaded { bytes });
                }
                Err(e) if e.is_transient() => e,
                Err(e) => {
                    remove_quietly(&temp).await;
                    return Err(e);
                }
            };

            failures += 1;
            let delay = match self.policy.decide(failures) {
                RetryDecision::Retry { delay, .. } => delay,
                RetryDecision::GiveUp => {
                    remove_quietly(&temp).await;
                    return Err(Error::RetriesExhausted {
                        retries: self.policy.max_retries(),
                        last_error: error.to_string(),
                    });
                }
            };

            tracing::debug!(
                "Connection error on page {}: {}. Retrying in {:?} (attempt {}/{})",
                target.page,
                error,
                delay,
                failures,
                self.policy.max_retries()
            );
            observer.retry_scheduled(target, failures, self.policy.max_retries(), delay, &error);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    remove_quietly(&temp).await;
                    return Err(Error::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Run one attempt: request the archive and stream it into `temp`.
    async fn transfer(
        &self,
        target: &TransferTarget,
        temp: &Path,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
    ) -> Result<u64> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = self.source.open_archive(&target.ids) => response?,
        };

        let (content_length, mut body) = match response {
            ArchiveResponse::Stream {
                content_length,
                body,
            } => (content_length, body),
            ArchiveResponse::Rejected { status, body } => {
                return Err(Error::Rejected { status, body });
            }
        };

        observer.transfer_started(target, content_length);

        let file = File::create(temp).await?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut downloaded: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                next = tokio::time::timeout(self.chunk_timeout, body.next()) => next,
            };

            let chunk = match next {
                Ok(Some(chunk)) => chunk?,
                Ok(None) => break,
                Err(_) => {
                    return Err(Error::Timeout(format!(
                        "no data received for {}s after {} bytes",
                        self.chunk_timeout.as_secs(),
                        downloaded
                    )))
                }
            };

            for piece in chunk.chunks(CHUNK_SIZE) {
                writer.write_all(piece).await?;
                downloaded += piece.len() as u64;
                observer.bytes_transferred(target, downloaded);
            }
        }

        writer.flush().await?;
        writer.get_ref().sync_all().await?;

        if let Some(expected) = content_length {
            if expected != downloaded {
                return Err(Error::Connection(format!(
                    "stream ended after {} of {} bytes",
                    downloaded, expected
                )));
            }
        }

        Ok(downloaded)
    }
}

/// Move the finished temp file over the destination.
async fn commit(temp: &Path, dest: &Path) -> Result<()> {
    remove_if_exists(dest).await?;
    tokio::fs::rename(temp, dest).await?;
    Ok(())
}
