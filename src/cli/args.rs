//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Action, Config, ProgressMode};

/// GoPro cloud library bulk downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "gopro-archiver",
    version,
    about = "Bulk download your GoPro cloud media library as zip archives",
    long_about = "Lists the media library page by page and downloads one zip archive per page.\n\n\
                  Credentials are read from the AUTH_TOKEN and USER_ID environment variables \
                  (the gp_access_token and gp_user_id browser cookies)."
)]
pub struct Args {
    /// What to do with the listed pages.
    #[arg(long, value_enum)]
    pub action: Option<ActionArg>,

    /// Number of pages to process (default: all).
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Items per page, which is also the number of items per archive.
    #[arg(long = "per-page")]
    pub per_page: Option<u32>,

    /// First page to process (1-based).
    #[arg(short, long = "start-page")]
    pub start_page: Option<u32>,

    /// Directory receiving the page archives.
    #[arg(short = 'd', long = "download-path")]
    pub download_path: Option<PathBuf>,

    /// How download progress is shown.
    #[arg(long = "progress-mode", value_enum)]
    pub progress_mode: Option<ProgressModeArg>,

    /// Retries per archive after network failures.
    #[arg(long = "max-retries")]
    pub max_retries: Option<u32>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "gopro-archiver.toml")]
    pub config: PathBuf,

    /// API base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Session token (gp_access_token cookie).
    #[arg(long = "auth-token", env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Account id (gp_user_id cookie).
    #[arg(long = "user-id", env = "USER_ID")]
    pub user_id: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI action argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionArg {
    /// Print the items of every page.
    List,
    /// Download one archive per page.
    Download,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::List => Action::List,
            ActionArg::Download => Action::Download,
        }
    }
}

/// CLI progress mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressModeArg {
    /// Rewrite one status line in place.
    Inline,
    /// One line per progress update.
    Newline,
    /// No byte progress.
    Noline,
    /// Progress bar.
    Bar,
}

impl From<ProgressModeArg> for ProgressMode {
    fn from(arg: ProgressModeArg) -> Self {
        match arg {
            ProgressModeArg::Inline => ProgressMode::Inline,
            ProgressModeArg::Newline => ProgressMode::Newline,
            ProgressModeArg::Noline => ProgressMode::Noline,
            ProgressModeArg::Bar => ProgressMode::Bar,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        // Credentials (flag or environment)
        if let Some(token) = self.auth_token {
            config.account.auth_token = token;
        }

        if let Some(user_id) = self.user_id {
            config.account.user_id = user_id;
        }

        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }

        if let Some(action) = self.action {
            config.options.action = action.into();
        }

        if let Some(start_page) = self.start_page {
            config.options.start_page = start_page;
        }

        if let Some(pages) = self.pages {
            config.options.pages = Some(pages);
        }

        if let Some(per_page) = self.per_page {
            config.options.per_page = per_page;
        }

        if let Some(path) = self.download_path {
            config.options.download_path = path;
        }

        if let Some(mode) = self.progress_mode {
            config.options.progress_mode = mode.into();
        }

        if let Some(retries) = self.max_retries {
            config.options.max_retries = retries;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["gopro-archiver"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.options.per_page = 50;

        parse(&[
            "--action",
            "list",
            "--pages",
            "2",
            "--start-page",
            "4",
            "--progress-mode",
            "bar",
            "--download-path",
            "/tmp/gopro",
            "--max-retries",
            "2",
            "--auth-token",
            "tok",
            "--user-id",
            "uid",
        ])
        .merge_into_config(&mut config);

        assert_eq!(config.options.action, Action::List);
        assert_eq!(config.options.pages, Some(2));
        assert_eq!(config.options.start_page, 4);
        assert_eq!(config.options.per_page, 50);
        assert_eq!(config.options.progress_mode, ProgressMode::Bar);
        assert_eq!(config.options.download_path, PathBuf::from("/tmp/gopro"));
        assert_eq!(config.options.max_retries, 2);
        assert_eq!(config.account.auth_token, "tok");
        assert_eq!(config.account.user_id, "uid");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = Config::default();
        config.account.user_id = "from-file".into();
        config.options.start_page = 7;

        let args = Args::try_parse_from(["gopro-archiver", "--debug"]).unwrap();
        assert!(args.debug);
        assert_eq!(args.config, PathBuf::from("gopro-archiver.toml"));

        // Environment may provide credentials on the test host
        let env_user = args.user_id.clone();
        args.merge_into_config(&mut config);

        assert_eq!(config.options.start_page, 7);
        assert_eq!(config.options.action, Action::Download);
        if env_user.is_none() {
            assert_eq!(config.account.user_id, "from-file");
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Args::try_parse_from(["gopro-archiver", "--progress-mode", "fancy"]).is_err());
    }
}
