//! Login command - run the authentication handshake.

use anyhow::Result;
use clap::Args;

use crate::api::FysoClient;
use crate::cli::AuthArgs;
use crate::local::LocalConfig;
use crate::types::TokenScope;

#[derive(Args)]
pub struct LoginCmd;

impl LoginCmd {
    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        let config = LocalConfig::load()?;
        let credential = auth.credential(&config)?;
        let tenant = auth.tenant(&config);

        let client = FysoClient::new();
        let session = client.authenticate(&credential, tenant.as_deref()).await?;

        match session.scope {
            TokenScope::Account => println!("Logged in as {}.", credential.email),
            TokenScope::Tenant(tenant) => {
                println!("Logged in as {} (tenant {}).", credential.email, tenant)
            }
        }

        Ok(())
    }
}
