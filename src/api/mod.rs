//! Client for the Fyso REST API.
//!
//! Every operation runs its own authentication handshake: login, then an
//! optional tenant selection, then the data call with the resulting token.
//! No token outlives the operation that obtained it.
//!
//! # Example
//!
//! ```ignore
//! let client = FysoClient::new();
//! let session = client.authenticate(&credential, Some("tenant-1")).await?;
//! let records = client.list_records(&session, "contacts", 50, 0).await?;
//! ```

mod auth;
mod batch;
mod error;
mod metadata;
mod records;
#[cfg(test)]
pub(crate) mod testing;
mod transport;
mod webhooks;

pub use error::FysoError;
pub use transport::{HttpTransport, Transport};
pub use webhooks::{SubscriptionManager, SubscriptionSlot};

/// Entry point for all API components.
///
/// Holds only the transport; credentials and tokens are passed per call.
pub struct FysoClient<T = HttpTransport> {
    transport: T,
}

impl FysoClient<HttpTransport> {
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl Default for FysoClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: transport::Transport> FysoClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
