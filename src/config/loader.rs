//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::{Credential, API_BASE, DEFAULT_USER_AGENT};
use crate::config::modes::{Action, ProgressMode};
use crate::download::RetryPolicy;
use crate::error::{Error, Result};
use crate::media::PageWindow;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Session credentials.
///
/// Usually supplied through the `AUTH_TOKEN` and `USER_ID` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Value of the `gp_access_token` cookie.
    #[serde(default)]
    pub auth_token: String,

    /// Value of the `gp_user_id` cookie.
    #[serde(default)]
    pub user_id: String,
}

/// API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Run options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// list or download.
    #[serde(default)]
    pub action: Action,

    /// First page to fetch (1-based).
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Number of pages to fetch; unset means all.
    #[serde(default)]
    pub pages: Option<u32>,

    /// Items per page (and per archive).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Directory receiving the page archives.
    #[serde(default = "default_download_path")]
    pub download_path: PathBuf,

    /// How download progress is shown.
    #[serde(default)]
    pub progress_mode: ProgressMode,

    /// Retries per archive after transient network failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            action: Action::default(),
            start_page: default_start_page(),
            pages: None,
            per_page: default_per_page(),
            download_path: default_download_path(),
            progress_mode: ProgressMode::default(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    API_BASE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    30
}

fn default_download_path() -> PathBuf {
    PathBuf::from("./download")
}

fn default_max_retries() -> u32 {
    crate::download::DEFAULT_MAX_RETRIES
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Credential built from the account section, surrounding whitespace removed.
    pub fn credential(&self) -> Credential {
        Credential::new(
            self.account.auth_token.trim(),
            self.account.user_id.trim(),
        )
    }

    /// Page window selected by the options.
    pub fn page_window(&self) -> PageWindow {
        PageWindow::new(
            self.options.start_page,
            self.options.pages.unwrap_or(PageWindow::ALL),
            self.options.per_page,
        )
    }

    /// Retry policy for archive transfers.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.options.max_retries)
    }
}
