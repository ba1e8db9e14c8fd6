//! Session authenticator: login and tenant-scoped token exchange.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::FysoClient;
use super::error::FysoError;
use super::transport::{ApiRequest, ApiResponse, Envelope, Transport, endpoint};
use crate::types::{Credential, Session, TokenScope};

const LOGIN_FAILED: &str = "login failed";
const TENANT_SELECT_FAILED: &str = "tenant selection failed";

#[derive(Debug, Deserialize)]
struct TokenData {
    token: Option<String>,
}

/// Pull the token out of an auth response or explain why there is none.
fn extract_token(response: &ApiResponse, fallback: &str) -> Result<SecretString, FysoError> {
    let envelope: Option<Envelope<TokenData>> = response.envelope();

    let message = match &envelope {
        Some(env) => env.message(),
        None => None,
    };

    let token = envelope
        .filter(|env| env.success && response.is_success())
        .and_then(|env| env.data)
        .and_then(|data| data.token)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) => Ok(SecretString::from(token)),
        None => Err(FysoError::Authentication(
            message.unwrap_or_else(|| fallback.to_string()),
        )),
    }
}

impl<T: Transport> FysoClient<T> {
    /// Exchange account credentials for a session token.
    pub async fn login(
        &self,
        base_url: &Url,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, FysoError> {
        debug!(email, "logging in");

        let request = ApiRequest::new(Method::POST, endpoint(base_url, &["api", "auth", "login"]))
            .json(json!({
                "email": email,
                "password": password.expose_secret(),
            }));

        let response = self.transport.send(request).await?;
        extract_token(&response, LOGIN_FAILED)
    }

    /// Exchange a session token for a token scoped to one tenant.
    pub async fn select_tenant(
        &self,
        base_url: &Url,
        session_token: &SecretString,
        tenant_id: &str,
    ) -> Result<SecretString, FysoError> {
        debug!(tenant = tenant_id, "selecting tenant");

        let url = endpoint(base_url, &["api", "auth", "tenants", tenant_id, "select"]);
        let request = ApiRequest::new(Method::POST, url).bearer(session_token.expose_secret());

        let response = self.transport.send(request).await?;
        extract_token(&response, TENANT_SELECT_FAILED)
    }

    /// Full handshake. Always logs in; selects a tenant when one is given.
    pub async fn authenticate(
        &self,
        credential: &Credential,
        tenant_id: Option<&str>,
    ) -> Result<Session, FysoError> {
        let session_token = self
            .login(&credential.base_url, &credential.email, &credential.password)
            .await?;

        let (token, scope) = match tenant_id.map(str::trim).filter(|t| !t.is_empty()) {
            Some(tenant) => {
                let token = self
                    .select_tenant(&credential.base_url, &session_token, tenant)
                    .await?;
                (token, TokenScope::Tenant(tenant.to_string()))
            }
            None => (session_token, TokenScope::Account),
        };

        Ok(Session {
            base_url: credential.base_url.clone(),
            token,
            scope,
        })
    }
}
