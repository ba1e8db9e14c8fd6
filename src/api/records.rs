//! Record gateway: CRUD on `/api/entities/{entity}/records`.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use super::FysoClient;
use super::error::FysoError;
use super::transport::{ApiRequest, Transport, endpoint};
use crate::types::Session;

fn records_url(session: &Session, entity: &str, id: Option<&str>) -> Url {
    match id {
        Some(id) => endpoint(&session.base_url, &["api", "entities", entity, "records", id]),
        None => endpoint(&session.base_url, &["api", "entities", entity, "records"]),
    }
}

impl<T: Transport> FysoClient<T> {
    async fn record_call(
        &self,
        session: &Session,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Option<Value>, FysoError> {
        let mut request = ApiRequest::new(method, url).bearer(session.token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }
        self.transport.send(request).await?.into_data()
    }

    /// Create a record. Returns the server's copy.
    pub async fn create_record(
        &self,
        session: &Session,
        entity: &str,
        fields: &Map<String, Value>,
    ) -> Result<Value, FysoError> {
        debug!(entity, "creating record");

        let data = self
            .record_call(
                session,
                Method::POST,
                records_url(session, entity, None),
                Some(Value::Object(fields.clone())),
            )
            .await?;

        Ok(data.unwrap_or_else(|| json!({})))
    }

    pub async fn get_record(&self, session: &Session, entity: &str, id: &str) -> Result<Value, FysoError> {
        debug!(entity, id, "fetching record");

        self.record_call(session, Method::GET, records_url(session, entity, Some(id)), None)
            .await?
            .filter(|data| !data.is_null())
            .ok_or_else(|| FysoError::NotFound(format!("{entity}/{id}")))
    }

    /// One page of records, in the order the server returns them.
    pub async fn list_records(
        &self,
        session: &Session,
        entity: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Value>, FysoError> {
        debug!(entity, limit, offset, "listing records");

        let mut url = records_url(session, entity, None);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let data = self.record_call(session, Method::GET, url, None).await?;

        Ok(match data {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        })
    }

    pub async fn update_record(
        &self,
        session: &Session,
        entity: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<Value, FysoError> {
        debug!(entity, id, "updating record");

        let data = self
            .record_call(
                session,
                Method::PUT,
                records_url(session, entity, Some(id)),
                Some(Value::Object(fields.clone())),
            )
            .await?;

        Ok(data.unwrap_or_else(|| json!({})))
    }

    /// Delete a record. The result is synthesized, whatever the server sent.
    pub async fn delete_record(&self, session: &Session, entity: &str, id: &str) -> Result<Value, FysoError> {
        debug!(entity, id, "deleting record");

        let request = ApiRequest::new(Method::DELETE, records_url(session, entity, Some(id)))
            .bearer(session.token.expose_secret());
        self.transport.send(request).await?.into_data()?;

        Ok(json!({ "success": true, "id": id }))
    }
}
