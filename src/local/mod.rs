//! On-disk state: configuration and trigger subscription ids.

mod config;
mod state;

pub use config::{CredentialOverrides, LocalConfig};
pub use state::FileSlot;
