//! CLI command implementations.

mod config;
mod entities;
mod fields;
mod listen;
mod login;
mod records;
mod tenants;
mod trigger;

pub use config::ConfigCmd;
pub use entities::EntitiesCmd;
pub use fields::FieldsCmd;
pub use login::LoginCmd;
pub use records::RecordsCmd;
pub use tenants::TenantsCmd;
pub use trigger::TriggerCmd;

use std::io::Write;

use anyhow::Result;

use crate::types::Item;

/// Print items as JSON lines, one per item.
pub(crate) fn print_items(items: &[Item]) -> Result<()> {
    write_items(&mut std::io::stdout().lock(), items)
}

/// Write items as JSON lines. Write failures (a closed pipe) come back as errors.
pub(crate) fn write_items(out: &mut impl Write, items: &[Item]) -> Result<()> {
    for item in items {
        writeln!(out, "{}", serde_json::to_string(&item.json)?)?;
    }
    out.flush()?;
    Ok(())
}
