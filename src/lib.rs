//! GoPro Archiver - bulk retrieval of a GoPro cloud media library.
//!
//! The library lists the media library page by page and downloads one zip
//! archive per page.
//!
//! # Features
//!
//! - Paginated catalog enumeration with a page window
//! - Page archives written through a temp file and renamed on completion
//! - Validation of archives left by earlier runs
//! - Retry with capped exponential backoff on network faults
//! - Cooperative cancellation
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use gopro_archiver::{enumerate, Config, MediaApi, NoopObserver};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("gopro-archiver.toml"))?;
//!     let api = MediaApi::new(
//!         config.credential(),
//!         &config.api.base_url,
//!         &config.api.user_agent,
//!     )?;
//!     api.validate().await?;
//!
//!     let catalog = enumerate(
//!         &api,
//!         &config.page_window(),
//!         &CancellationToken::new(),
//!         &NoopObserver,
//!     )
//!     .await?;
//!     println!("{} items", catalog.total_items());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{Credential, MediaApi, MediaSource};
pub use config::{Action, Config, ProgressMode};
pub use download::{
    download_pages, enumerate, ArchiveFetcher, FetchOutcome, NoopObserver, ProgressObserver,
    RetryPolicy, RunStats,
};
pub use error::{Error, Result};
pub use media::{Catalog, MediaItem, Page, PageWindow, TransferTarget};
