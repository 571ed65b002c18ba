//! Per-page download loop over an enumerated catalog.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::download::archive::{ArchiveFetcher, FetchOutcome};
use crate::download::observer::ProgressObserver;
use crate::download::state::RunStats;
use crate::error::{Error, Result};
use crate::media::Catalog;

/// Fetch the archive of every listed page into `dir`.
///
/// A failing page is recorded and the run moves on to the next one. Only
/// cancellation ends the loop early.
pub async fn download_pages(
    fetcher: &ArchiveFetcher<'_>,
    catalog: &Catalog,
    dir: &Path,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> Result<RunStats> {
    let mut stats = RunStats {
        pages_listed: catalog.len() as u64,
        items_listed: catalog.total_items() as u64,
        ..Default::default()
    };

    for page in catalog.pages() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        observer.page_started(page);

        if page.is_empty() {
            tracing::warn!("Page {} has no items, nothing to download", page.number);
            stats.record_skipped();
            continue;
        }

        let target = page.target(dir);
        match fetcher.fetch(&target, cancel, observer).await {
            Ok(FetchOutcome::AlreadyComplete { .. }) => stats.record_verified(),
            Ok(FetchOutcome::Downloaded { bytes }) => stats.record_downloaded(bytes),
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                tracing::debug!(
                    "Page {} failed ({}): {}",
                    target.page,
                    target.dest.display(),
                    e
                );
                stats.record_failure(&target, &e);
            }
        }
    }

    tracing::info!(
        "Pages done: {} downloaded, {} verified, {} failed",
        stats.pages_downloaded,
        stats.pages_verified,
        stats.pages_failed()
    );

    Ok(stats)
}
