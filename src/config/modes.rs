//! Action and progress mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the run does with the listed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Print the items of every page.
    List,
    /// Download one archive per page (default).
    #[default]
    Download,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::List => write!(f, "list"),
            Action::Download => write!(f, "download"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(Action::List),
            "download" => Ok(Action::Download),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// How transfer progress is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Rewrite one status line in place (default).
    #[default]
    Inline,
    /// Print a new line for every progress update.
    Newline,
    /// Show no byte progress.
    Noline,
    /// Render a progress bar.
    Bar,
}

impl fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressMode::Inline => write!(f, "inline"),
            ProgressMode::Newline => write!(f, "newline"),
            ProgressMode::Noline => write!(f, "noline"),
            ProgressMode::Bar => write!(f, "bar"),
        }
    }
}

impl FromStr for ProgressMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(ProgressMode::Inline),
            "newline" => Ok(ProgressMode::Newline),
            "noline" => Ok(ProgressMode::Noline),
            "bar" => Ok(ProgressMode::Bar),
            _ => Err(format!("Unknown progress mode: {}", s)),
        }
    }
}
