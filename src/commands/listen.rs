//! Listen command - receive webhook deliveries on a local HTTP endpoint.

use std::io::Write;
use std::net::SocketAddr;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use clap::Args;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::trigger::{TargetArgs, activate, open_manager};
use super::write_items;
use crate::api::{SubscriptionManager, SubscriptionSlot, Transport};
use crate::cli::AuthArgs;

#[derive(Args)]
pub struct ListenCmd {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,

    /// Path deliveries are posted to
    #[arg(long, default_value = "/fyso/webhook")]
    pub path: String,

    /// Public base URL that reaches --bind (e.g. a tunnel); defaults to http://<bind>
    #[arg(long)]
    pub public_url: Option<String>,
}

impl ListenCmd {
    fn route_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }

    fn callback_url(&self) -> String {
        let base = match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.bind),
        };
        format!("{}{}", base, self.route_path())
    }

    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        let callback_url = self.callback_url();
        url::Url::parse(&callback_url).context("Callback URL is not valid")?;

        let mut manager = open_manager(
            auth,
            &self.target.name.name,
            &self.target.entity,
            &self.target.events,
            &callback_url,
        )?;

        let listener = tokio::net::TcpListener::bind(self.bind)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind))?;

        activate(&mut manager).await?;

        let (tx, rx) = mpsc::channel(100);
        let app = router(&self.route_path(), tx);
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        eprintln!("Listening on {} (deliveries to {})", self.bind, callback_url);
        eprintln!("Press Ctrl+C to stop.\n");

        relay(
            &mut manager,
            rx,
            server,
            tokio::signal::ctrl_c(),
            &mut std::io::stdout().lock(),
        )
        .await
    }
}

/// Print deliveries until `shutdown` fires or the server stops, then
/// deactivate. Deactivation runs however the loop ended.
async fn relay<T: Transport, S: SubscriptionSlot>(
    manager: &mut SubscriptionManager<T, S>,
    mut rx: mpsc::Receiver<Value>,
    mut server: JoinHandle<std::io::Result<()>>,
    shutdown: impl Future<Output = std::io::Result<()>>,
    out: &mut impl Write,
) -> Result<()> {
    tokio::pin!(shutdown);

    let outcome: Result<()> = loop {
        tokio::select! {
            Some(body) = rx.recv() => {
                if let Err(err) = write_items(out, &manager.receive(body)) {
                    break Err(err.context("Failed to print delivery"));
                }
            }
            joined = &mut server => {
                break match joined {
                    Ok(Ok(())) => Err(anyhow!("Webhook listener stopped")),
                    Ok(Err(err)) => Err(anyhow::Error::new(err).context("Webhook listener failed")),
                    Err(err) => Err(anyhow::Error::new(err).context("Webhook listener task failed")),
                };
            }
            _ = &mut shutdown => {
                eprintln!("\nStopping listener.");
                break Ok(());
            }
        }
    };

    server.abort();

    let stored = manager.slot().get().ok().flatten();
    let cleanup = manager.delete().await;
    if let (Ok(_), Some(id)) = (&cleanup, stored) {
        info!(id = %id, "deactivated trigger");
    }

    outcome?;
    cleanup?;
    Ok(())
}

/// Router accepting deliveries on `path` and forwarding bodies to `tx`.
fn router(path: &str, tx: mpsc::Sender<Value>) -> Router {
    Router::new().route(path, post(deliver)).with_state(tx)
}

async fn deliver(State(tx): State<mpsc::Sender<Value>>, body: Bytes) -> StatusCode {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "rejected non-JSON delivery");
                return StatusCode::BAD_REQUEST;
            }
        }
    };

    match tx.send(payload).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
