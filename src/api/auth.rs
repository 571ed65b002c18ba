//! Session credentials and the request headers derived from them.

use std::fmt;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::{Error, Result};

/// Cookie carrying the access token.
const ACCESS_TOKEN_COOKIE: &str = "gp_access_token";

/// Cookie carrying the user identifier.
const USER_ID_COOKIE: &str = "gp_user_id";

/// Media type the API negotiates on.
const ACCEPT_MEDIA: &str = "application/vnd.gopro.jk.media+json; version=2.0.0";

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Session credential copied out of a logged-in browser.
///
/// Immutable for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    auth_token: String,
    user_id: String,
}

impl Credential {
    pub fn new(auth_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            user_id: user_id.into(),
        }
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Cookie header value sent with every request.
    pub fn cookie_header(&self) -> String {
        format!(
            "{}={}; {}={}",
            ACCESS_TOKEN_COOKIE, self.auth_token, USER_ID_COOKIE, self.user_id
        )
    }

    /// Build the fixed header set for API requests.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let mut cookie = HeaderValue::from_str(&self.cookie_header()).map_err(|e| {
            Error::ConfigValidation {
                field: "auth_token".to_string(),
                message: format!("Credential is not a valid header value: {}", e),
            }
        })?;
        cookie.set_sensitive(true);
        headers.insert(header::COOKIE, cookie);

        Ok(headers)
    }
}

// Keep the token out of debug logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("auth_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
