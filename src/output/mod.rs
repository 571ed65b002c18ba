//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output and page listings
//! - The terminal progress observer
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use self::console::{
    print_banner, print_config_summary, print_error, print_info, print_page_listing,
    print_success, print_warning,
};
pub use progress::{create_download_bar, format_progress, ConsoleObserver};
pub use stats::{print_catalog_summary, print_run_stats};
