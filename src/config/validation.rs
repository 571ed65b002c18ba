//! Configuration validation logic.

use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_credential_part("auth_token", &config.account.auth_token)?;
    validate_credential_part("user_id", &config.account.user_id)?;
    validate_base_url(&config.api.base_url)?;
    validate_page_window(
        config.options.start_page,
        config.options.pages,
        config.options.per_page,
    )?;

    Ok(())
}

/// Validate one half of the session credential.
pub fn validate_credential_part(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingConfig(format!(
            "{} (set the {} environment variable)",
            field,
            field.to_uppercase()
        )));
    }

    // Check for placeholder values
    let lower = value.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Value appears to be a placeholder. Copy it from your browser cookies."
                .to_string(),
        });
    }

    if value.chars().any(|c| c.is_control() || c == ';') {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Value contains characters not allowed in a cookie".to_string(),
        });
    }

    Ok(())
}

/// Validate the API base URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: format!("Invalid URL '{}': {}", base_url, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate the page window options.
pub fn validate_page_window(start_page: u32, pages: Option<u32>, per_page: u32) -> Result<()> {
    if start_page == 0 {
        return Err(Error::ConfigValidation {
            field: "start_page".to_string(),
            message: "Pages are numbered from 1".to_string(),
        });
    }

    if pages == Some(0) {
        return Err(Error::ConfigValidation {
            field: "pages".to_string(),
            message: "At least one page must be requested".to_string(),
        });
    }

    if per_page == 0 {
        return Err(Error::ConfigValidation {
            field: "per_page".to_string(),
            message: "At least one item per page is required".to_string(),
        });
    }

    Ok(())
}
