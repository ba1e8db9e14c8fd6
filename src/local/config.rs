//! Local configuration management.
//!
//! Config is stored at `~/.config/fyso/config.toml` and contains:
//! - API base URL
//! - Account email and password
//! - Default tenant

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::Credential;

pub const CONFIG_DIR: &str = "fyso";
const CONFIG_FILE: &str = "config.toml";

/// Local configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    /// API base URL (e.g. https://app.fyso.dev).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Account email.
    #[serde(default)]
    pub email: Option<String>,

    /// Account password.
    #[serde(default)]
    pub password: Option<String>,

    /// Tenant used when a command does not name one.
    #[serde(default)]
    pub default_tenant: Option<String>,
}

/// Values that override the config file (flags, then environment).
#[derive(Debug, Default)]
pub struct CredentialOverrides<'a> {
    pub base_url: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl LocalConfig {
    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")
    }

    pub fn has_password(&self) -> bool {
        non_empty(self.password.as_deref()).is_some()
    }

    /// Build a credential, letting overrides win over stored values.
    pub fn credential(&self, overrides: &CredentialOverrides<'_>) -> Result<Credential> {
        let base_url = non_empty(overrides.base_url)
            .or(non_empty(self.base_url.as_deref()))
            .context("No base URL configured. Run `fyso config set-url <url>` or set FYSO_BASE_URL.")?;
        let email = non_empty(overrides.email)
            .or(non_empty(self.email.as_deref()))
            .context("No email configured. Run `fyso config set-email <email>` or set FYSO_EMAIL.")?;
        let password = overrides
            .password
            .filter(|p| !p.is_empty())
            .or(self.password.as_deref().filter(|p| !p.is_empty()))
            .context("No password configured. Run `fyso config set-password` or set FYSO_PASSWORD.")?;

        Credential::new(base_url, email, SecretString::from(password.to_string()))
            .context("Invalid base URL")
    }

    /// Explicit tenant, else the configured default.
    pub fn tenant<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        non_empty(explicit).or(non_empty(self.default_tenant.as_deref()))
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join(CONFIG_DIR))
    }
}
