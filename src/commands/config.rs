//! Config command - manage local configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::local::LocalConfig;

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub command: ConfigSubCmd,
}

#[derive(Subcommand)]
pub enum ConfigSubCmd {
    /// Set the API base URL
    SetUrl(SetUrlCmd),

    /// Set the account email
    SetEmail(SetEmailCmd),

    /// Set the account password (prompted for when omitted)
    SetPassword(SetPasswordCmd),

    /// Set the tenant used when --tenant is not given
    SetTenant(SetTenantCmd),

    /// Show current configuration
    Show,
}

#[derive(Args)]
pub struct SetUrlCmd {
    /// API base URL (e.g., https://app.fyso.dev)
    pub url: String,
}

#[derive(Args)]
pub struct SetEmailCmd {
    /// Account email
    #[arg(value_name = "EMAIL")]
    pub value: String,
}

#[derive(Args)]
pub struct SetPasswordCmd {
    #[arg(value_name = "PASSWORD")]
    pub value: Option<String>,
}

#[derive(Args)]
pub struct SetTenantCmd {
    /// Tenant id
    #[arg(value_name = "TENANT")]
    pub value: String,
}

/// Use the given password, or prompt without echo when none was given.
fn password_value(given: Option<&str>, prompt: impl FnOnce() -> std::io::Result<String>) -> Result<String> {
    let password = match given {
        Some(p) => p.to_string(),
        None => prompt().context("Failed to read password")?,
    };
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

impl ConfigCmd {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            ConfigSubCmd::SetUrl(cmd) => {
                url::Url::parse(&cmd.url).context("Not a valid URL")?;
                let mut config = LocalConfig::load()?;
                config.base_url = Some(cmd.url.clone());
                config.save()?;
                println!("Base URL set to: {}", cmd.url);
            }
            ConfigSubCmd::SetEmail(cmd) => {
                let mut config = LocalConfig::load()?;
                config.email = Some(cmd.value.clone());
                config.save()?;
                println!("Email set to: {}", cmd.value);
            }
            ConfigSubCmd::SetPassword(cmd) => {
                let password = password_value(cmd.value.as_deref(), || {
                    rpassword::prompt_password("Password: ")
                })?;
                let mut config = LocalConfig::load()?;
                config.password = Some(password);
                config.save()?;
                println!("Password saved.");
            }
            ConfigSubCmd::SetTenant(cmd) => {
                let mut config = LocalConfig::load()?;
                config.default_tenant = Some(cmd.value.clone());
                config.save()?;
                println!("Default tenant set to: {}", cmd.value);
            }
            ConfigSubCmd::Show => {
                let config = LocalConfig::load()?;
                println!("Config: {}", LocalConfig::config_path()?.display());
                println!();
                println!("base_url:   {}", config.base_url.as_deref().unwrap_or("(not set)"));
                println!("email:      {}", config.email.as_deref().unwrap_or("(not set)"));
                println!(
                    "password:   {}",
                    if config.has_password() {
                        "(set)"
                    } else {
                        "(not set)"
                    }
                );
                println!(
                    "tenant:     {}",
                    config.default_tenant.as_deref().unwrap_or("(not set)")
                );
            }
        }
        Ok(())
    }
}
