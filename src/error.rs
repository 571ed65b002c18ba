//! Error types for the gopro-archiver application.

use std::io;

use thiserror::Error;

use crate::api::types::ServerError;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed (HTTP {status}): {body}. Issue a new auth token")]
    Authentication { status: u16, body: ServerError },

    #[error("Failed to get media for page {page} (HTTP {status}): {body}. Try renewing the auth token")]
    Enumeration {
        page: u32,
        status: u16,
        body: ServerError,
    },

    // Download errors
    #[error("Archive request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: ServerError },

    #[error("Download failed after {retries} retries: {last_error}")]
    RetriesExhausted { retries: u32, last_error: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Interrupted by user")]
    Cancelled,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure is a network-level fault worth retrying with the
    /// same request (reset, timeout, malformed chunk).
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Connection(_) | Error::Timeout(_) => true,
            Error::Http(e) => {
                e.is_timeout() || e.is_connect() || e.is_body() || e.is_request() || e.is_decode()
            }
            Error::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }

    /// Map the error onto the process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::Api(_) | Error::Authentication { .. } | Error::Enumeration { .. } => {
                exit_codes::API_ERROR
            }
            Error::Cancelled => exit_codes::ABORT,
            Error::Rejected { .. } | Error::RetriesExhausted { .. } => exit_codes::PAGES_FAILED,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const PAGES_FAILED: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
