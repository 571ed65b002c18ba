//! Catalog enumeration: walk the search endpoint page by page.

use tokio_util::sync::CancellationToken;

use crate::api::MediaSource;
use crate::download::observer::ProgressObserver;
use crate::error::{Error, Result};
use crate::media::{Catalog, Page, PageWindow};

/// List every page of `window` that the server has.
///
/// Stops once the server's page count or the window end is reached. Always
/// performs at least one request. Any failed request fails the whole
/// enumeration; pages fetched before it are dropped.
pub async fn enumerate(
    source: &dyn MediaSource,
    window: &PageWindow,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    let mut total_pages: Option<u32> = None;
    let mut current = window.start;
    let last_page = window.last_page();

    tracing::info!(
        "Listing media from page {} ({} per page)...",
        window.start,
        window.per_page
    );

    loop {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = source.search(current, window.per_page) => response?,
        };

        // Latched from the first response only.
        let total = *total_pages.get_or_insert(response.total_pages);
        catalog.set_total_pages(total);

        let page = Page::new(current, response.items);
        tracing::debug!("Page {}/{} has {} items", current, total, page.len());
        observer.page_listed(&page, total);
        catalog.insert(page);

        if current >= total || current >= last_page {
            break;
        }

        current += 1;
    }

    tracing::info!(
        "Listed {} page(s) with {} items",
        catalog.len(),
        catalog.total_items()
    );

    Ok(catalog)
}
