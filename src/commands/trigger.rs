//! Trigger command - manage webhook subscriptions for a named trigger.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use super::listen::ListenCmd;
use crate::api::{FysoClient, HttpTransport, SubscriptionManager, SubscriptionSlot};
use crate::cli::AuthArgs;
use crate::local::{FileSlot, LocalConfig};
use crate::types::{EventKind, SubscriptionTarget};

#[derive(Args)]
pub struct TriggerCmd {
    #[command(subcommand)]
    pub command: TriggerSubCmd,
}

#[derive(Subcommand)]
pub enum TriggerSubCmd {
    /// Register the webhook subscription unless it already exists
    Activate(ActivateCmd),

    /// Show whether the subscription is active
    Status(TargetArgs),

    /// Delete the webhook subscription
    Deactivate(NameArgs),

    /// Activate, print deliveries until Ctrl+C, then deactivate
    Listen(ListenCmd),
}

#[derive(Args)]
pub struct NameArgs {
    /// Trigger name; keys the stored subscription id
    #[arg(long, short = 'n')]
    pub name: String,
}

#[derive(Args)]
pub struct TargetArgs {
    #[command(flatten)]
    pub name: NameArgs,

    /// Entity to watch
    #[arg(long, short = 'e')]
    pub entity: String,

    /// Events to subscribe to
    #[arg(long, value_enum, value_delimiter = ',', default_value = "created,updated,deleted")]
    pub events: Vec<EventKind>,
}

#[derive(Args)]
pub struct ActivateCmd {
    #[command(flatten)]
    pub target: TargetArgs,

    /// URL the platform should deliver events to
    #[arg(long)]
    pub callback_url: String,
}

pub(crate) type FileManager = SubscriptionManager<HttpTransport, FileSlot>;

/// Build the manager for a trigger, backed by the on-disk slot.
pub(crate) fn open_manager(
    auth: &AuthArgs,
    name: &str,
    entity: &str,
    events: &[EventKind],
    callback_url: &str,
) -> Result<FileManager> {
    let config = LocalConfig::load()?;
    let credential = auth.credential(&config)?;

    let target = SubscriptionTarget {
        tenant_id: auth.tenant(&config),
        entity: entity.to_string(),
        events: events.to_vec(),
        callback_url: callback_url.to_string(),
    };

    Ok(SubscriptionManager::new(
        FysoClient::new(),
        credential,
        FileSlot::open(name)?,
        target,
    ))
}

/// Create the subscription unless the stored one is still live.
pub(crate) async fn activate(manager: &mut FileManager) -> Result<()> {
    if manager.check_exists().await? {
        println!("Subscription already active.");
        return Ok(());
    }

    // A stale id left behind by a lost subscription is replaced.
    let created = manager.create().await.with_context(|| {
        format!(
            "Failed to register webhook subscription for '{}'",
            manager.target().entity
        )
    })?;
    if !created {
        bail!(
            "Failed to register webhook subscription for '{}': no subscription id returned",
            manager.target().entity
        );
    }

    let id = manager.slot().get()?.unwrap_or_default();
    println!("Subscription {} active for '{}'.", id, manager.target().entity);
    Ok(())
}

impl TriggerCmd {
    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        match &self.command {
            TriggerSubCmd::Activate(cmd) => {
                url::Url::parse(&cmd.callback_url).context("--callback-url is not a valid URL")?;
                let target = &cmd.target;
                let mut manager = open_manager(
                    auth,
                    &target.name.name,
                    &target.entity,
                    &target.events,
                    &cmd.callback_url,
                )?;
                activate(&mut manager).await
            }
            TriggerSubCmd::Status(target) => {
                let manager = open_manager(auth, &target.name.name, &target.entity, &target.events, "")?;
                let stored = manager.slot().get()?;
                let live = manager.check_exists().await?;

                match (stored, live) {
                    (None, _) => println!("No subscription stored for '{}'.", target.name.name),
                    (Some(id), true) => println!("Subscription {} is active.", id),
                    (Some(id), false) => println!(
                        "Subscription {} is stored but missing remotely; activate again to recreate it.",
                        id
                    ),
                }
                Ok(())
            }
            TriggerSubCmd::Deactivate(args) => {
                let mut manager = open_manager(auth, &args.name, "", &[], "")?;
                let stored = manager.slot().get()?;
                manager.delete().await?;

                match stored {
                    Some(id) => println!("Subscription {} removed.", id),
                    None => println!("Nothing to remove for '{}'.", args.name),
                }
                Ok(())
            }
            TriggerSubCmd::Listen(cmd) => cmd.run(auth).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        cmd: TriggerSubCmd,
    }

    #[test]
    fn test_default_events() {
        let parsed = Harness::try_parse_from(["t", "status", "--name", "orders", "--entity", "orders"]).unwrap();
        match parsed.cmd {
            TriggerSubCmd::Status(target) => assert_eq!(
                target.events,
                vec![EventKind::Created, EventKind::Updated, EventKind::Deleted]
            ),
            _ => panic!("expected status"),
        }
    }

    #[test]
    fn test_event_list() {
        let parsed = Harness::try_parse_from([
            "t",
            "activate",
            "--name",
            "orders",
            "--entity",
            "orders",
            "--events",
            "created,deleted",
            "--callback-url",
            "https://hooks.example.com/orders",
        ])
        .unwrap();
        match parsed.cmd {
            TriggerSubCmd::Activate(cmd) => {
                assert_eq!(cmd.target.events, vec![EventKind::Created, EventKind::Deleted])
            }
            _ => panic!("expected activate"),
        }
    }
}
