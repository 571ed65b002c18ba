//! Progress events emitted by the enumerator and the archive fetcher.
//!
//! Presentation (progress lines, bars, listings) lives behind this trait so
//! the transfer engine has a single code path regardless of how it is shown.

use std::time::Duration;

use crate::error::Error;
use crate::media::{Page, TransferTarget};

/// Receiver of engine progress events. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait ProgressObserver: Send + Sync {
    /// A search page was fetched and recorded.
    fn page_listed(&self, page: &Page, total_pages: u32) {}

    /// The download loop reached `page`.
    fn page_started(&self, page: &Page) {}

    /// A transfer attempt is about to issue its request (`attempt` is 0-based).
    fn attempt_started(&self, target: &TransferTarget, attempt: u32) {}

    /// The server accepted the archive request and began streaming.
    fn transfer_started(&self, target: &TransferTarget, total: Option<u64>) {}

    /// Running byte count of the current attempt; never decreases within it.
    fn bytes_transferred(&self, target: &TransferTarget, downloaded: u64) {}

    /// A transient fault occurred and the transfer will be retried after `delay`.
    fn retry_scheduled(
        &self,
        target: &TransferTarget,
        retry: u32,
        max_retries: u32,
        delay: Duration,
        error: &Error,
    ) {
    }

    /// The archive was written and moved into place.
    fn transfer_finished(&self, target: &TransferTarget, bytes: u64) {}

    /// The transfer ended without producing the archive.
    fn transfer_failed(&self, target: &TransferTarget, error: &Error) {}

    /// An existing archive was found trustworthy; nothing was transferred.
    fn existing_verified(&self, target: &TransferTarget, bytes: u64) {}

    /// An existing archive was found stale and is being replaced.
    fn existing_discarded(&self, target: &TransferTarget, reason: &str) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
