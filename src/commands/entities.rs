//! Entities command - list the entities of a tenant.

use anyhow::Result;
use clap::Args;

use crate::api::FysoClient;
use crate::cli::AuthArgs;
use crate::local::LocalConfig;

#[derive(Args)]
pub struct EntitiesCmd {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl EntitiesCmd {
    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        let config = LocalConfig::load()?;
        let credential = auth.credential(&config)?;
        let tenant = auth.tenant(&config);

        if tenant.is_none() {
            println!("No tenant selected. Pass --tenant or run `fyso config set-tenant <id>`.");
            return Ok(());
        }

        let options = FysoClient::new()
            .list_entities(&credential, tenant.as_deref())
            .await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&options)?);
            return Ok(());
        }

        if options.is_empty() {
            println!("No entities found.");
            return Ok(());
        }

        for option in &options {
            println!("{}\t{}", option.value, option.label);
        }

        Ok(())
    }
}
