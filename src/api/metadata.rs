//! Metadata lookups used to populate selection lists and field mappings.
//!
//! The list lookups never fail: whatever goes wrong is logged and an empty
//! list comes back, since the caller only uses them to fill pickers.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::FysoClient;
use super::error::FysoError;
use super::transport::{ApiRequest, Transport, endpoint};
use crate::types::{Credential, Entity, EntityField, RemoteSchema, SelectOption, Session, Tenant};

impl<T: Transport> FysoClient<T> {
    async fn fetch<D: DeserializeOwned>(&self, session: &Session, segments: &[&str]) -> Result<Option<D>, FysoError> {
        let request = ApiRequest::new(Method::GET, endpoint(&session.base_url, segments))
            .bearer(session.token.expose_secret());

        match self.transport.send(request).await?.into_data()? {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
        }
    }

    /// Tenants visible to the account. Uses the session token only.
    pub async fn tenants(&self, credential: &Credential) -> Result<Vec<Tenant>, FysoError> {
        let session = self.authenticate(credential, None).await?;
        let tenants = self.fetch(&session, &["api", "auth", "tenants"]).await?;
        Ok(tenants.unwrap_or_default())
    }

    pub async fn list_tenants(&self, credential: &Credential) -> Vec<SelectOption> {
        match self.tenants(credential).await {
            Ok(tenants) => tenants
                .into_iter()
                .map(|t| SelectOption {
                    label: t.display_label(),
                    value: t.id,
                })
                .collect(),
            Err(err) => {
                warn!(error = %err, "could not load tenants");
                Vec::new()
            }
        }
    }

    /// Entities of one tenant.
    pub async fn entities(&self, credential: &Credential, tenant_id: &str) -> Result<Vec<Entity>, FysoError> {
        let session = self.authenticate(credential, Some(tenant_id)).await?;
        let entities = self.fetch(&session, &["api", "metadata", "entities"]).await?;
        Ok(entities.unwrap_or_default())
    }

    /// Empty until a tenant has been chosen.
    pub async fn list_entities(&self, credential: &Credential, tenant_id: Option<&str>) -> Vec<SelectOption> {
        let Some(tenant_id) = tenant_id.filter(|t| !t.trim().is_empty()) else {
            debug!("no tenant chosen, skipping entity lookup");
            return Vec::new();
        };

        match self.entities(credential, tenant_id).await {
            Ok(entities) => entities
                .into_iter()
                .map(|e| SelectOption {
                    label: e.display_label().to_string(),
                    value: e.name,
                })
                .collect(),
            Err(err) => {
                warn!(tenant = tenant_id, error = %err, "could not load entities");
                Vec::new()
            }
        }
    }

    /// Normalized field schema of one entity.
    pub async fn describe_entity_fields(
        &self,
        credential: &Credential,
        tenant_id: &str,
        entity: &str,
    ) -> Result<Vec<EntityField>, FysoError> {
        let session = self.authenticate(credential, Some(tenant_id)).await?;
        let schema: Option<RemoteSchema> = self
            .fetch(&session, &["api", "metadata", "entities", entity])
            .await?;

        Ok(schema
            .map(|s| s.fields.into_iter().map(EntityField::from).collect())
            .unwrap_or_default())
    }
}
