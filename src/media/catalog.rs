//! Catalog of listed pages.

use std::collections::BTreeMap;
use std::path::Path;

use crate::api::types::MediaItem;
use crate::media::target::TransferTarget;

/// Contiguous range of pages selected for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// First page to request (1-based).
    pub start: u32,
    /// Number of pages to request; [`PageWindow::ALL`] means no limit.
    pub limit: u32,
    /// Items per page.
    pub per_page: u32,
}

impl PageWindow {
    /// Page limit meaning "every page the server has".
    pub const ALL: u32 = u32::MAX;

    pub fn new(start: u32, limit: u32, per_page: u32) -> Self {
        Self {
            start,
            limit,
            per_page,
        }
    }

    /// Last page inside the window.
    ///
    /// At least the start page is always requested.
    pub fn last_page(&self) -> u32 {
        self.start.saturating_add(self.limit.max(1) - 1)
    }

    /// Whether the window is unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.limit == Self::ALL
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            start: 1,
            limit: Self::ALL,
            per_page: 30,
        }
    }
}

/// Items of one server-assigned page, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub items: Vec<MediaItem>,
}

impl Page {
    pub fn new(number: u32, items: Vec<MediaItem>) -> Self {
        Self { number, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Item identifiers, in server order.
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Item names for listing.
    pub fn filenames(&self) -> Vec<&str> {
        self.items.iter().map(MediaItem::display_name).collect()
    }

    /// Sum of the item sizes, when every item reports one.
    pub fn total_size(&self) -> Option<u64> {
        self.items.iter().map(|item| item.file_size).sum()
    }

    /// Transfer target for this page's archive inside `dir`.
    pub fn target(&self, dir: &Path) -> TransferTarget {
        TransferTarget::for_page(self.number, self.ids(), dir)
    }
}

/// Pages fetched during one enumeration run, keyed by page number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pages: BTreeMap<u32, Page>,
    total_pages: u32,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total page count reported by the server on the first response.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub(crate) fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages;
    }

    pub fn insert(&mut self, page: Page) {
        self.pages.insert(page.number, page);
    }

    pub fn get(&self, number: u32) -> Option<&Page> {
        self.pages.get(&number)
    }

    /// Pages in ascending page order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn total_items(&self) -> usize {
        self.pages.values().map(Page::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn item(id: &str, size: Option<u64>) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            created_at: None,
            content_title: None,
            filename: Some(format!("{}.mp4", id)),
            file_extension: Some("mp4".into()),
            file_size: size,
        }
    }

    #[test]
    fn test_window_last_page() {
        assert_eq!(PageWindow::new(1, 3, 30).last_page(), 3);
        assert_eq!(PageWindow::new(2, 1, 30).last_page(), 2);
        assert_eq!(PageWindow::new(5, 0, 30).last_page(), 5);
        assert_eq!(PageWindow::default().last_page(), u32::MAX);
        assert!(PageWindow::default().is_unbounded());
    }

    #[test]
    fn test_page_ids_and_sizes() {
        let page = Page::new(1, vec![item("a", Some(10)), item("b", Some(5))]);
        assert_eq!(page.ids(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(page.filenames(), vec!["a.mp4", "b.mp4"]);
        assert_eq!(page.total_size(), Some(15));

        let partial = Page::new(2, vec![item("a", Some(10)), item("c", None)]);
        assert_eq!(partial.total_size(), None);
    }

    #[test]
    fn test_catalog_orders_pages_and_derives_targets() {
        let mut catalog = Catalog::new();
        catalog.insert(Page::new(3, vec![item("c", None)]));
        catalog.insert(Page::new(1, vec![item("a", None)]));
        catalog.insert(Page::new(2, Vec::new()));

        assert_eq!(catalog.page_numbers(), vec![1, 2, 3]);
        assert_eq!(catalog.total_items(), 2);

        let dests: Vec<PathBuf> = catalog
            .pages()
            .map(|page| page.target(Path::new("/out")).dest)
            .collect();
        assert_eq!(
            dests,
            vec![
                PathBuf::from("/out/1_page.zip"),
                PathBuf::from("/out/2_page.zip"),
                PathBuf::from("/out/3_page.zip"),
            ]
        );
    }
}
