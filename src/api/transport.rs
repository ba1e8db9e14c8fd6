//! HTTP transport trait and the JSON envelope every endpoint answers with.

use std::future::Future;

use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::error::FysoError;

/// A single outbound API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            bearer: None,
            body: None,
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and decoded body of a response.
///
/// Empty bodies decode to `Value::Null`, non-JSON bodies to a JSON string.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best message the body offers, falling back to the status reason.
    pub fn error_message(&self) -> String {
        error_message(&self.body).unwrap_or_else(|| {
            StatusCode::from_u16(self.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request failed")
                .to_string()
        })
    }

    pub fn api_error(&self) -> FysoError {
        FysoError::Api {
            status: self.status,
            message: self.error_message(),
        }
    }

    /// Decode the `{success, data, error}` envelope, if the body is one.
    pub fn envelope<T: DeserializeOwned>(&self) -> Option<Envelope<T>> {
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Unwrap the `data` member of a data-operation response.
    ///
    /// Fails on non-2xx statuses and on envelopes reporting `success: false`.
    /// A 2xx with an empty body carries no data.
    pub fn into_data(self) -> Result<Option<Value>, FysoError> {
        if !self.is_success() {
            return Err(self.api_error());
        }
        if self.body.is_null() {
            return Ok(None);
        }

        let envelope: Envelope<Value> = match &self.body {
            Value::Object(_) => serde_json::from_value(self.body.clone()).ok(),
            _ => None,
        }
        .ok_or_else(|| FysoError::Api {
            status: self.status,
            message: "response is not a JSON envelope".to_string(),
        })?;
        if !envelope.success {
            return Err(FysoError::Api {
                status: self.status,
                message: envelope
                    .message()
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        Ok(envelope.data)
    }
}

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(message_from)
            .or_else(|| self.message.clone().filter(|m| !m.is_empty()))
    }
}

fn message_from(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("message").and_then(message_from),
        _ => None,
    }
}

fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => map
            .get("error")
            .and_then(message_from)
            .or_else(|| map.get("message").and_then(message_from)),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Build `{base}/{segments...}`, percent-encoding each segment and keeping
/// any path prefix the base URL carries.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Sends API requests. Implemented over reqwest for real traffic; tests
/// script responses in memory.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, FysoError>> + Send;
}

/// reqwest-backed transport. No timeout beyond the client default.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FysoError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self.client.request(request.method, request.url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => value,
                Err(_) => Value::String(text),
            }
        };

        debug!(status, "received response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(status: u16, body: Value) -> ApiResponse {
        ApiResponse { status, body }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("https://app.fyso.dev").unwrap();
        let url = endpoint(&base, &["api", "entities", "my entity", "records", "a/b"]);
        assert_eq!(
            url.as_str(),
            "https://app.fyso.dev/api/entities/my%20entity/records/a%2Fb"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://example.com/fyso").unwrap();
        let url = endpoint(&base, &["api", "auth", "login"]);
        assert_eq!(url.as_str(), "https://example.com/fyso/api/auth/login");
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(
            response(400, json!({"success": false, "error": "bad input"})).error_message(),
            "bad input"
        );
        assert_eq!(
            response(400, json!({"error": {"message": "nested"}})).error_message(),
            "nested"
        );
        assert_eq!(response(403, json!({"message": "nope"})).error_message(), "nope");
        assert_eq!(response(502, Value::String("Bad gateway page".into())).error_message(), "Bad gateway page");
        assert_eq!(response(404, Value::Null).error_message(), "Not Found");
    }

    #[test]
    fn test_into_data() {
        let data = response(200, json!({"success": true, "data": {"id": "r1"}}))
            .into_data()
            .unwrap();
        assert_eq!(data, Some(json!({"id": "r1"})));

        let err = response(200, json!({"success": false, "error": "invalid field"}))
            .into_data()
            .unwrap_err();
        assert!(matches!(err, FysoError::Api { status: 200, ref message } if message == "invalid field"));

        let err = response(500, json!({"success": false})).into_data().unwrap_err();
        assert!(matches!(err, FysoError::Api { status: 500, ref message } if message == "Internal Server Error"));
    }

    #[test]
    fn test_into_data_empty_success_body() {
        assert_eq!(response(204, Value::Null).into_data().unwrap(), None);
        assert_eq!(response(200, Value::Null).into_data().unwrap(), None);
    }

    #[test]
    fn test_into_data_rejects_non_envelope() {
        for body in [Value::String("<html>ok</html>".into()), json!([1, 2]), json!(true)] {
            let err = response(200, body).into_data().unwrap_err();
            assert!(
                matches!(err, FysoError::Api { status: 200, ref message } if message == "response is not a JSON envelope")
            );
        }
    }
}
