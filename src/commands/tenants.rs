//! Tenants command - list tenants available to the account.

use anyhow::Result;
use clap::Args;

use crate::api::FysoClient;
use crate::cli::AuthArgs;
use crate::local::LocalConfig;

#[derive(Args)]
pub struct TenantsCmd {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl TenantsCmd {
    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        let config = LocalConfig::load()?;
        let credential = auth.credential(&config)?;

        let options = FysoClient::new().list_tenants(&credential).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&options)?);
            return Ok(());
        }

        if options.is_empty() {
            println!("No tenants found.");
            return Ok(());
        }

        for option in &options {
            println!("{}\t{}", option.value, option.label);
        }

        Ok(())
    }
}
