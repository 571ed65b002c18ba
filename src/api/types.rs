//! API response type definitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Search response for one page of the media library.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedMedia,
    #[serde(rename = "_pages")]
    pub pages: PageInfo,
}

/// Embedded item list of a search response.
#[derive(Debug, Deserialize)]
pub struct EmbeddedMedia {
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

/// Paging information of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub current_page: Option<u32>,
    pub per_page: Option<u32>,
    pub total_items: Option<u64>,
    pub total_pages: u32,
}

/// A media record in the remote library.
///
/// Read-only projection of the server data; never mutated locally.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content_title: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl MediaItem {
    /// Name to show for the item, falling back to its identifier.
    pub fn display_name(&self) -> &str {
        self.filename
            .as_deref()
            .or(self.content_title.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Error body returned by the API on a non-success status.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerError {
    /// Body parsed as JSON.
    Structured(serde_json::Value),
    /// Body kept verbatim.
    Raw(String),
}

impl ServerError {
    /// Decide the representation of an error body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => ServerError::Structured(value),
            Err(_) => ServerError::Raw(body.to_string()),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Structured(value) => write!(f, "{}", value),
            ServerError::Raw(text) if text.is_empty() => write!(f, "<empty body>"),
            ServerError::Raw(text) => write!(f, "{}", text),
        }
    }
}
