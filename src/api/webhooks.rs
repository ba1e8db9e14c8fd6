//! Webhook subscription lifecycle.
//!
//! The only state is one persisted subscription id, owned by the caller and
//! reached through [`SubscriptionSlot`]. Empty slot means no subscription;
//! a held id means one is believed to exist remotely.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::FysoClient;
use super::error::FysoError;
use super::transport::{ApiRequest, Transport, endpoint};
use crate::types::{Credential, Item, Session, SubscriptionTarget, deserialize_id, deserialize_optional_id};

pub const SUBSCRIPTION_DESCRIPTION: &str = "Created by fyso-cli";

/// Host-owned storage for the subscription id.
pub trait SubscriptionSlot {
    fn get(&self) -> Result<Option<String>, FysoError>;
    fn set(&mut self, id: &str) -> Result<(), FysoError>;
    fn clear(&mut self) -> Result<(), FysoError>;
}

#[derive(Debug, Deserialize)]
struct SubscriptionRef {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSubscription {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    id: Option<String>,
}

/// Drives one trigger's subscription through absent → active → absent.
pub struct SubscriptionManager<T, S> {
    client: FysoClient<T>,
    credential: Credential,
    slot: S,
    target: SubscriptionTarget,
}

impl<T: Transport, S: SubscriptionSlot> SubscriptionManager<T, S> {
    pub fn new(client: FysoClient<T>, credential: Credential, slot: S, target: SubscriptionTarget) -> Self {
        Self {
            client,
            credential,
            slot,
            target,
        }
    }

    pub fn target(&self) -> &SubscriptionTarget {
        &self.target
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    async fn session(&self) -> Result<Session, FysoError> {
        self.client
            .authenticate(&self.credential, self.target.tenant_id.as_deref())
            .await
    }

    async fn remote_ids(&self, session: &Session) -> Result<Vec<String>, FysoError> {
        let mut url = endpoint(&session.base_url, &["api", "webhooks", "subscriptions"]);
        url.query_pairs_mut().append_pair("entityName", &self.target.entity);

        let request = ApiRequest::new(Method::GET, url).bearer(session.token.expose_secret());
        let data = self.client.transport().send(request).await?.into_data()?;

        let subscriptions: Vec<SubscriptionRef> = match data {
            Some(Value::Array(items)) => serde_json::from_value(Value::Array(items))?,
            _ => Vec::new(),
        };
        Ok(subscriptions.into_iter().map(|s| s.id).collect())
    }

    /// True only when an id is held and the remote side still lists it.
    ///
    /// A remote that lost the subscription reads as absent, so the next
    /// activation recreates it. Authentication failures are returned as
    /// errors; every other failure reads as `false`.
    pub async fn check_exists(&self) -> Result<bool, FysoError> {
        let Some(id) = self.slot.get()? else {
            return Ok(false);
        };

        let session = self.session().await?;
        match self.remote_ids(&session).await {
            Ok(ids) => {
                let exists = ids.iter().any(|remote| remote == &id);
                debug!(id = %id, exists, "checked subscription");
                Ok(exists)
            }
            Err(err) => {
                warn!(id = %id, error = %err, "could not list subscriptions");
                Ok(false)
            }
        }
    }

    /// Register the subscription and persist its id.
    ///
    /// Returns `false` and leaves the slot untouched when the server hands
    /// back no id. A rejected request returns the server's error.
    pub async fn create(&mut self) -> Result<bool, FysoError> {
        let session = self.session().await?;

        let events = self.target.event_types();
        let body = json!({
            "entityName": self.target.entity,
            "eventTypes": events,
            "url": self.target.callback_url,
            "description": SUBSCRIPTION_DESCRIPTION,
        });

        let url = endpoint(&session.base_url, &["api", "webhooks", "subscriptions"]);
        let request = ApiRequest::new(Method::POST, url)
            .bearer(session.token.expose_secret())
            .json(body);
        let response = self.client.transport().send(request).await?;

        let data = response
            .into_data()
            .inspect_err(|err| warn!(entity = %self.target.entity, error = %err, "subscription rejected"))?;
        let id = data
            .and_then(|data| serde_json::from_value::<CreatedSubscription>(data).ok())
            .and_then(|created| created.id)
            .filter(|id| !id.is_empty());

        match id {
            Some(id) => {
                self.slot.set(&id)?;
                info!(id = %id, entity = %self.target.entity, "subscription created");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the subscription. Idempotent; the remote delete is best-effort
    /// and the slot is cleared whatever it returns.
    pub async fn delete(&mut self) -> Result<bool, FysoError> {
        let Some(id) = self.slot.get()? else {
            return Ok(true);
        };

        let session = self.session().await?;
        let url = endpoint(&session.base_url, &["api", "webhooks", "subscriptions", &id]);
        let request = ApiRequest::new(Method::DELETE, url).bearer(session.token.expose_secret());

        match self.client.transport().send(request).await {
            Ok(response) if response.is_success() => debug!(id = %id, "subscription deleted"),
            Ok(response) => warn!(id = %id, status = response.status, "remote delete refused"),
            Err(err) => warn!(id = %id, error = %err, "remote delete failed"),
        }

        self.slot.clear()?;
        info!(id = %id, "subscription cleared");
        Ok(true)
    }

    /// Inbound delivery: the body becomes the output as-is.
    pub fn receive(&self, body: Value) -> Vec<Item> {
        vec![Item::new(body)]
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::types::EventKind;

    #[derive(Default)]
    struct MemorySlot(Option<String>);

    impl SubscriptionSlot for MemorySlot {
        fn get(&self) -> Result<Option<String>, FysoError> {
            Ok(self.0.clone())
        }

        fn set(&mut self, id: &str) -> Result<(), FysoError> {
            self.0 = Some(id.to_string());
            Ok(())
        }

        fn clear(&mut self) -> Result<(), FysoError> {
            self.0 = None;
            Ok(())
        }
    }

    fn token(t: &str) -> Value {
        json!({"success": true, "data": {"token": t}})
    }

    fn handshake(t: ScriptedTransport) -> ScriptedTransport {
        t.reply(200, token("s")).reply(200, token("t"))
    }

    fn manager(
        transport: &ScriptedTransport,
        held: Option<&str>,
    ) -> SubscriptionManager<ScriptedTransport, MemorySlot> {
        let credential = Credential::new(
            "https://app.fyso.dev",
            "ada@example.com",
            SecretString::from("pw".to_string()),
        )
        .unwrap();
        let target = SubscriptionTarget {
            tenant_id: Some("t-1".into()),
            entity: "contacts".into(),
            events: vec![EventKind::Created, EventKind::Deleted],
            callback_url: "https://hooks.example.com/fyso".into(),
        };
        SubscriptionManager::new(
            FysoClient::with_transport(transport.clone()),
            credential,
            MemorySlot(held.map(str::to_string)),
            target,
        )
    }

    #[tokio::test]
    async fn test_check_exists_without_id_makes_no_calls() {
        let transport = ScriptedTransport::new();
        let mgr = manager(&transport, None);

        assert!(!mgr.check_exists().await.unwrap());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_exists_matches_remote_id() {
        let transport = handshake(ScriptedTransport::new())
            .reply(200, json!({"success": true, "data": [{"id": 7}, {"id": "sub-1"}]}));
        let mgr = manager(&transport, Some("sub-1"));

        assert!(mgr.check_exists().await.unwrap());
        assert_eq!(
            transport.calls()[2],
            "GET /api/webhooks/subscriptions?entityName=contacts"
        );
    }

    #[tokio::test]
    async fn test_check_exists_detects_drift() {
        let transport = handshake(ScriptedTransport::new())
            .reply(200, json!({"success": true, "data": []}));
        let mgr = manager(&transport, Some("sub-1"));
        assert!(!mgr.check_exists().await.unwrap());

        let transport = handshake(ScriptedTransport::new())
            .reply(200, json!({"success": true, "data": [{"id": "other"}]}));
        let mgr = manager(&transport, Some("sub-1"));
        assert!(!mgr.check_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_persists_id() {
        let transport = handshake(ScriptedTransport::new())
            .reply(201, json!({"success": true, "data": {"id": "sub-9"}}));
        let mut mgr = manager(&transport, None);

        assert!(mgr.create().await.unwrap());
        assert_eq!(mgr.slot().get().unwrap().as_deref(), Some("sub-9"));

        let req = &transport.requests()[2];
        assert_eq!(req.url.path(), "/api/webhooks/subscriptions");
        assert_eq!(
            req.body,
            Some(json!({
                "entityName": "contacts",
                "eventTypes": ["created", "deleted"],
                "url": "https://hooks.example.com/fyso",
                "description": SUBSCRIPTION_DESCRIPTION,
            }))
        );
    }

    #[tokio::test]
    async fn test_create_without_id_stays_absent() {
        let transport = handshake(ScriptedTransport::new())
            .reply(200, json!({"success": true, "data": {}}));
        let mut mgr = manager(&transport, None);

        assert!(!mgr.create().await.unwrap());
        assert!(mgr.slot().get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejection_returns_server_message() {
        let transport = handshake(ScriptedTransport::new())
            .reply(400, json!({"success": false, "error": "url must be https"}));
        let mut mgr = manager(&transport, None);

        let err = mgr.create().await.unwrap_err();
        assert_eq!(err.to_string(), "API error (400): url must be https");
        assert!(mgr.slot().get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_check_exists_propagates_authentication_failure() {
        let transport =
            ScriptedTransport::new().reply(401, json!({"success": false, "error": "bad creds"}));
        let mgr = manager(&transport, Some("sub-1"));

        assert!(mgr.check_exists().await.unwrap_err().is_authentication());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let transport = ScriptedTransport::new();
        let mut mgr = manager(&transport, None);

        assert!(mgr.delete().await.unwrap());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_clears_even_when_remote_fails() {
        let transport = handshake(ScriptedTransport::new())
            .reply(500, json!({"success": false, "error": "oops"}));
        let mut mgr = manager(&transport, Some("sub-1"));

        assert!(mgr.delete().await.unwrap());
        assert!(mgr.slot().get().unwrap().is_none());
        assert_eq!(transport.calls()[2], "DELETE /api/webhooks/subscriptions/sub-1");
    }

    #[tokio::test]
    async fn test_delete_keeps_id_when_login_fails() {
        let transport =
            ScriptedTransport::new().reply(401, json!({"success": false, "error": "bad creds"}));
        let mut mgr = manager(&transport, Some("sub-1"));

        assert!(mgr.delete().await.unwrap_err().is_authentication());
        assert_eq!(mgr.slot().get().unwrap().as_deref(), Some("sub-1"));
    }

    #[test]
    fn test_receive_passes_body_through() {
        let transport = ScriptedTransport::new();
        let mgr = manager(&transport, None);

        let body = json!({"event": "created", "record": {"id": "r1", "nested": [1, 2]}});
        let items = mgr.receive(body.clone());
        assert_eq!(items, vec![Item::new(body)]);
    }
}
