//! GoPro cloud media API module.
//!
//! This module provides:
//! - HTTP client for the media library endpoints
//! - Session credentials and derived headers
//! - API response types

pub mod auth;
pub mod client;
pub mod types;

pub use auth::Credential;
pub use client::{
    ArchiveProbe, ArchiveResponse, ByteStream, MediaApi, MediaSource, SearchPage, API_BASE,
    DEFAULT_USER_AGENT,
};
pub use types::*;
