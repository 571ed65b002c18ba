//! Progress rendering for the transfer engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ProgressMode;
use crate::download::ProgressObserver;
use crate::error::Error;
use crate::media::{Page, TransferTarget};
use crate::output::console::{
    print_error, print_info, print_page_listing, print_success, print_warning,
};

/// Create a progress bar for downloads of known size.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

/// Create a byte counter for downloads of unknown size.
pub fn create_byte_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Progress line shown by the inline and newline modes.
pub fn format_progress(downloaded: u64) -> String {
    let megabytes = downloaded as f64 / 1024.0 / 1024.0;
    format!("downloaded: {:.2}MB ({} bytes)", megabytes, downloaded)
}

/// Observer that renders engine events on the terminal.
pub struct ConsoleObserver {
    mode: ProgressMode,
    term: Term,
    bar: Mutex<Option<ProgressBar>>,
    line_open: AtomicBool,
}

impl ConsoleObserver {
    pub fn new(mode: ProgressMode) -> Self {
        Self {
            mode,
            term: Term::stdout(),
            bar: Mutex::new(None),
            line_open: AtomicBool::new(false),
        }
    }

    /// Close any in-place progress line or bar before printing a message.
    fn end_progress(&self) {
        if self.line_open.swap(false, Ordering::SeqCst) {
            let _ = self.term.write_line("");
        }
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(bar) = bar.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl ProgressObserver for ConsoleObserver {
    fn page_listed(&self, page: &Page, total_pages: u32) {
        print_info(&format!(
            "page parsed ({}/{}): {} items",
            page.number,
            total_pages,
            page.len()
        ));
    }

    fn page_started(&self, page: &Page) {
        print_page_listing(page);
        if page.is_empty() {
            print_warning(&format!("page {} has no items, skipping", page.number));
        }
    }

    fn attempt_started(&self, target: &TransferTarget, attempt: u32) {
        if attempt == 0 {
            print_info(&format!("downloading to {}", target.dest.display()));
        }
    }

    fn transfer_started(&self, _target: &TransferTarget, total: Option<u64>) {
        if self.mode != ProgressMode::Bar {
            return;
        }
        let bar = match total {
            Some(total) => create_download_bar(total),
            None => create_byte_spinner(),
        };
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn bytes_transferred(&self, _target: &TransferTarget, downloaded: u64) {
        match self.mode {
            ProgressMode::Inline => {
                let _ = self.term.clear_line();
                let _ = self.term.write_str(&format_progress(downloaded));
                self.line_open.store(true, Ordering::SeqCst);
            }
            ProgressMode::Newline => println!("{}", format_progress(downloaded)),
            ProgressMode::Noline => {}
            ProgressMode::Bar => {
                if let Ok(bar) = self.bar.lock() {
                    if let Some(bar) = bar.as_ref() {
                        bar.set_position(downloaded);
                    }
                }
            }
        }
    }

    fn retry_scheduled(
        &self,
        _target: &TransferTarget,
        retry: u32,
        max_retries: u32,
        delay: Duration,
        error: &Error,
    ) {
        self.end_progress();
        print_warning(&format!("connection error: {}", error));
        print_info(&format!(
            "retrying in {:.0?} (attempt {}/{})...",
            delay, retry, max_retries
        ));
    }

    fn transfer_finished(&self, target: &TransferTarget, bytes: u64) {
        self.end_progress();
        print_success(&format!(
            "download completed: {} ({} bytes)",
            target.dest.display(),
            bytes
        ));
    }

    fn transfer_failed(&self, target: &TransferTarget, error: &Error) {
        self.end_progress();
        if matches!(error, Error::Cancelled) {
            print_warning(&format!("page {} cancelled", target.page));
        } else {
            print_error(&format!("page {} failed: {}", target.page, error));
        }
    }

    fn existing_verified(&self, target: &TransferTarget, bytes: u64) {
        print_success(&format!(
            "file already exists and is complete: {} ({} bytes)",
            target.dest.display(),
            bytes
        ));
    }

    fn existing_discarded(&self, target: &TransferTarget, reason: &str) {
        print_warning(&format!(
            "{}: {}, re-downloading...",
            target.dest.display(),
            reason
        ));
    }
}
