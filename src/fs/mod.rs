//! Filesystem module.
//!
//! Provides:
//! - Deterministic archive naming per page
//! - Temp sibling paths for in-flight transfers
//! - Directory creation and best-effort cleanup

pub mod paths;

pub use paths::{
    ensure_dir, page_archive_path, remove_if_exists, remove_quietly, temp_path, TEMP_SUFFIX,
};
