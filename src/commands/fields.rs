//! Fields command - describe the fields of an entity.

use anyhow::{Context, Result};
use clap::Args;

use crate::api::FysoClient;
use crate::cli::AuthArgs;
use crate::local::LocalConfig;

#[derive(Args)]
pub struct FieldsCmd {
    /// Entity name
    #[arg(long, short = 'e')]
    pub entity: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl FieldsCmd {
    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        let config = LocalConfig::load()?;
        let credential = auth.credential(&config)?;
        let tenant = auth
            .tenant(&config)
            .context("No tenant selected. Pass --tenant or run `fyso config set-tenant <id>`.")?;

        let fields = FysoClient::new()
            .describe_entity_fields(&credential, &tenant, &self.entity)
            .await
            .with_context(|| format!("Failed to describe entity '{}'", self.entity))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&fields)?);
            return Ok(());
        }

        for field in &fields {
            let required = if field.required { " (required)" } else { "" };
            println!("{}: {}{}", field.id, field.field_type, required);
            if field.display_name != field.id {
                println!("   {}", field.display_name);
            }
            for option in &field.options {
                if option.label == option.value {
                    println!("   - {}", option.value);
                } else {
                    println!("   - {} ({})", option.value, option.label);
                }
            }
        }

        println!("\n{} fields", fields.len());

        Ok(())
    }
}
