//! CLI argument definitions.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::{
    ConfigCmd, EntitiesCmd, FieldsCmd, LoginCmd, RecordsCmd, TenantsCmd, TriggerCmd,
};
use crate::local::{CredentialOverrides, LocalConfig};
use crate::types::Credential;

#[derive(Parser)]
#[command(name = "fyso")]
#[command(about = "Fyso - records, metadata and webhook triggers from the command line")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings. Each falls back to the environment, then the config file.
#[derive(Args, Debug)]
pub struct AuthArgs {
    /// API base URL
    #[arg(long, env = "FYSO_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Account email
    #[arg(long, env = "FYSO_EMAIL", global = true)]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "FYSO_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Tenant to act in
    #[arg(long, short = 't', env = "FYSO_TENANT", global = true)]
    pub tenant: Option<String>,
}

impl AuthArgs {
    pub fn credential(&self, config: &LocalConfig) -> Result<Credential> {
        config.credential(&CredentialOverrides {
            base_url: self.base_url.as_deref(),
            email: self.email.as_deref(),
            password: self.password.as_deref(),
        })
    }

    /// `--tenant`, else the configured default.
    pub fn tenant(&self, config: &LocalConfig) -> Option<String> {
        config.tenant(self.tenant.as_deref()).map(str::to_string)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Check credentials by running the login handshake
    Login(LoginCmd),

    /// List tenants available to the account
    Tenants(TenantsCmd),

    /// List entities of a tenant
    Entities(EntitiesCmd),

    /// Show the fields of an entity
    Fields(FieldsCmd),

    /// Create, read, list, update and delete records
    Records(RecordsCmd),

    /// Manage webhook triggers
    Trigger(TriggerCmd),

    /// Manage configuration (base URL, credentials, default tenant)
    Config(ConfigCmd),
}

impl Command {
    pub async fn execute(&self, auth: &AuthArgs) -> Result<()> {
        match self {
            Command::Login(cmd) => cmd.run(auth).await,
            Command::Tenants(cmd) => cmd.run(auth).await,
            Command::Entities(cmd) => cmd.run(auth).await,
            Command::Fields(cmd) => cmd.run(auth).await,
            Command::Records(cmd) => cmd.run(auth).await,
            Command::Trigger(cmd) => cmd.run(auth).await,
            Command::Config(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_tenant_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fyso", "records", "list", "--entity", "contacts", "--tenant", "t-1",
        ])
        .unwrap();
        assert_eq!(cli.auth.tenant.as_deref(), Some("t-1"));
    }
}
