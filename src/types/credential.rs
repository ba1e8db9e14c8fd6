use secrecy::SecretString;
use url::Url;

use crate::api::FysoError;

/// Account credentials for one operation.
///
/// Built once per command from flags, environment and the config file and
/// never mutated afterwards. The password is kept in a [`SecretString`] so it
/// stays out of `Debug` output and logs.
#[derive(Debug)]
pub struct Credential {
    pub base_url: Url,
    pub email: String,
    pub password: SecretString,
}

impl Credential {
    pub fn new(base_url: &str, email: impl Into<String>, password: SecretString) -> Result<Self, FysoError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url =
            Url::parse(trimmed).map_err(|e| FysoError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(FysoError::InvalidBaseUrl(trimmed.to_string()));
        }

        Ok(Self {
            base_url,
            email: email.into(),
            password,
        })
    }
}

/// What a bearer token is allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenScope {
    /// Session token from login, valid across the whole account.
    Account,
    /// Token derived from a session token for a single tenant.
    Tenant(String),
}

/// Result of one authentication handshake.
///
/// Lives for exactly one operation; nothing stores or reuses it.
#[derive(Debug)]
pub struct Session {
    pub base_url: Url,
    pub token: SecretString,
    pub scope: TokenScope,
}
