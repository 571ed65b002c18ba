//! Download module: the resilient transfer engine.
//!
//! This module provides:
//! - Catalog enumeration over the paginated search endpoint
//! - Archive fetching with validation, temp-file commits and retry
//! - The per-page download loop
//! - Retry policy with capped exponential backoff
//! - Download state and run statistics
//! - The progress observer interface used by the presentation layer

pub mod archive;
pub mod catalog;
pub mod observer;
pub mod pages;
pub mod retry;
pub mod state;
pub mod validate;

pub use archive::{ArchiveFetcher, FetchOutcome, CHUNK_SIZE};
pub use catalog::enumerate;
pub use observer::{NoopObserver, ProgressObserver};
pub use pages::download_pages;
pub use retry::{RetryDecision, RetryPolicy, DEFAULT_MAX_RETRIES};
pub use state::{DownloadState, PageFailure, RunStats};
pub use validate::{validate_existing, Validation};

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory media source and recording observer for engine tests.

    use std::collections::VecDeque;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::stream::{self, StreamExt};

    use crate::api::types::{MediaItem, ServerError};
    use crate::api::{ArchiveProbe, ArchiveResponse, MediaSource, SearchPage};
    use crate::download::observer::ProgressObserver;
    use crate::error::{Error, Result};
    use crate::media::{Page, TransferTarget};

    /// Items `p<page>-<i>` for one page.
    pub fn media_page(page: u32, count: usize) -> Vec<MediaItem> {
        (0..count)
            .map(|i| MediaItem {
                id: format!("p{}-{}", page, i),
                created_at: None,
                content_title: None,
                filename: Some(format!("GOPR{:04}.JPG", page as usize * 100 + i)),
                file_extension: Some("jpg".into()),
                file_size: Some(1000),
            })
            .collect()
    }

    /// Write a zip with the given `(name, contents)` entries.
    pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[derive(Debug, Clone, Copy)]
    pub enum ProbeBehavior {
        Size(Option<u64>),
        Fail,
    }

    /// Scripted reply to one archive GET.
    #[derive(Debug, Clone)]
    pub enum FakeArchive {
        Declared {
            content_length: u64,
            chunks: Vec<Vec<u8>>,
        },
        Reject(u16, &'static str),
        ResetBeforeResponse,
        ResetAfter(Vec<u8>),
        Stall(Vec<u8>),
        Fatal,
    }

    impl FakeArchive {
        pub fn body(chunks: Vec<Vec<u8>>) -> Self {
            let content_length = chunks.iter().map(|c| c.len() as u64).sum();
            FakeArchive::Declared {
                content_length,
                chunks,
            }
        }
    }

    fn reset() -> Error {
        Error::Connection("connection reset by peer".into())
    }

    pub struct FakeSource {
        pages: Vec<Vec<MediaItem>>,
        reported_total: Option<fn(u32) -> u32>,
        search_failure: Option<(u32, u16, &'static str)>,
        probe: ProbeBehavior,
        archives: Mutex<VecDeque<FakeArchive>>,
        watch: Option<PathBuf>,
        search_calls: Mutex<Vec<u32>>,
        probe_calls: AtomicU32,
        joined_ids: Mutex<Vec<String>>,
        temp_seen: Mutex<Vec<bool>>,
    }

    impl FakeSource {
        pub fn new() -> Self {
            Self {
                pages: Vec::new(),
                reported_total: None,
                search_failure: None,
                probe: ProbeBehavior::Size(None),
                archives: Mutex::new(VecDeque::new()),
                watch: None,
                search_calls: Mutex::new(Vec::new()),
                probe_calls: AtomicU32::new(0),
                joined_ids: Mutex::new(Vec::new()),
                temp_seen: Mutex::new(Vec::new()),
            }
        }

        pub fn with_pages(mut self, pages: Vec<Vec<MediaItem>>) -> Self {
            self.pages = pages;
            self
        }

        pub fn with_reported_total(mut self, total: fn(u32) -> u32) -> Self {
            self.reported_total = Some(total);
            self
        }

        pub fn with_search_failure(mut self, page: u32, status: u16, body: &'static str) -> Self {
            self.search_failure = Some((page, status, body));
            self
        }

        pub fn with_probe(mut self, probe: ProbeBehavior) -> Self {
            self.probe = probe;
            self
        }

        pub fn with_archives(self, archives: Vec<FakeArchive>) -> Self {
            *self.archives.lock().unwrap() = archives.into();
            self
        }

        /// Record whether `path` exists each time an archive GET is issued.
        pub fn watching(mut self, path: PathBuf) -> Self {
            self.watch = Some(path);
            self
        }

        pub fn search_calls(&self) -> Vec<u32> {
            self.search_calls.lock().unwrap().clone()
        }

        pub fn probe_calls(&self) -> u32 {
            self.probe_calls.load(Ordering::SeqCst)
        }

        pub fn open_calls(&self) -> usize {
            self.joined_ids.lock().unwrap().len()
        }

        pub fn joined_ids(&self) -> Vec<String> {
            self.joined_ids.lock().unwrap().clone()
        }

        pub fn temp_seen_at_open(&self) -> Vec<bool> {
            self.temp_seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        async fn search(&self, page: u32, _per_page: u32) -> Result<SearchPage> {
            self.search_calls.lock().unwrap().push(page);

            if let Some((failing, status, body)) = self.search_failure {
                if failing == page {
                    return Err(Error::Enumeration {
                        page,
                        status,
                        body: ServerError::from_body(body),
                    });
                }
            }

            let items = self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default();
            let total_pages = match self.reported_total {
                Some(total) => total(page),
                None => self.pages.len() as u32,
            };

            Ok(SearchPage {
                page,
                items,
                total_pages,
            })
        }

        async fn probe_archive(&self, _ids: &[String]) -> Result<ArchiveProbe> {
            self.probe_calls.fetch_add(1, Ordering::SeqCst);
            match self.probe {
                ProbeBehavior::Size(content_length) => Ok(ArchiveProbe {
                    status: 200,
                    content_length,
                }),
                ProbeBehavior::Fail => Err(Error::Connection("probe failed".into())),
            }
        }

        async fn open_archive(&self, ids: &[String]) -> Result<ArchiveResponse> {
            self.joined_ids.lock().unwrap().push(ids.join(","));
            if let Some(path) = &self.watch {
                self.temp_seen.lock().unwrap().push(path.exists());
            }

            let next = self.archives.lock().unwrap().pop_front();
            match next {
                Some(FakeArchive::Declared {
                    content_length,
                    chunks,
                }) => Ok(ArchiveResponse::Stream {
                    content_length: Some(content_length),
                    body: stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c)))).boxed(),
                }),
                Some(FakeArchive::Reject(status, body)) => Ok(ArchiveResponse::Rejected {
                    status,
                    body: ServerError::from_body(body),
                }),
                Some(FakeArchive::ResetBeforeResponse) => Err(reset()),
                Some(FakeArchive::ResetAfter(bytes)) => Ok(ArchiveResponse::Stream {
                    content_length: None,
                    body: stream::iter(vec![Ok(Bytes::from(bytes)), Err(reset())]).boxed(),
                }),
                Some(FakeArchive::Stall(bytes)) => Ok(ArchiveResponse::Stream {
                    content_length: None,
                    body: stream::iter(vec![Ok(Bytes::from(bytes))])
                        .chain(stream::pending())
                        .boxed(),
                }),
                Some(FakeArchive::Fatal) => Err(Error::Api("unexpected response".into())),
                None => Err(Error::Api("no scripted archive response".into())),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        PageListed(u32, u32),
        PageStarted(u32),
        AttemptStarted(u32),
        TransferStarted(Option<u64>),
        BytesTransferred(u64),
        RetryScheduled { retry: u32, delay: Duration },
        TransferFinished(u64),
        TransferFailed(String),
        ExistingVerified(u64),
        ExistingDiscarded(String),
    }

    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl ProgressObserver for RecordingObserver {
        fn page_listed(&self, page: &Page, total_pages: u32) {
            self.push(Event::PageListed(page.number, total_pages));
        }

        fn page_started(&self, page: &Page) {
            self.push(Event::PageStarted(page.number));
        }

        fn attempt_started(&self, _target: &TransferTarget, attempt: u32) {
            self.push(Event::AttemptStarted(attempt));
        }

        fn transfer_started(&self, _target: &TransferTarget, total: Option<u64>) {
            self.push(Event::TransferStarted(total));
        }

        fn bytes_transferred(&self, _target: &TransferTarget, downloaded: u64) {
            self.push(Event::BytesTransferred(downloaded));
        }

        fn retry_scheduled(
            &self,
            _target: &TransferTarget,
            retry: u32,
            _max_retries: u32,
            delay: Duration,
            _error: &Error,
        ) {
            self.push(Event::RetryScheduled { retry, delay });
        }

        fn transfer_finished(&self, _target: &TransferTarget, bytes: u64) {
            self.push(Event::TransferFinished(bytes));
        }

        fn transfer_failed(&self, _target: &TransferTarget, error: &Error) {
            self.push(Event::TransferFailed(error.to_string()));
        }

        fn existing_verified(&self, _target: &TransferTarget, bytes: u64) {
            self.push(Event::ExistingVerified(bytes));
        }

        fn existing_discarded(&self, _target: &TransferTarget, reason: &str) {
            self.push(Event::ExistingDiscarded(reason.to_string()));
        }
    }
}
