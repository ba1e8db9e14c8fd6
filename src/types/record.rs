use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::api::FysoError;

pub const DEFAULT_LIMIT: u32 = 50;

/// One output item. Serialized as `{"json": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub json: Value,
}

impl Item {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Item standing in for a failed input when failures are captured.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            json: json!({ "error": message.into() }),
        }
    }
}

/// Record operations the gateway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Get => "get",
            OperationKind::List => "list",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = FysoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(OperationKind::Create),
            "get" => Ok(OperationKind::Get),
            "list" | "getall" | "get_all" => Ok(OperationKind::List),
            "update" => Ok(OperationKind::Update),
            "delete" => Ok(OperationKind::Delete),
            _ => Err(FysoError::UnknownOperation(s.to_string())),
        }
    }
}

/// A fully resolved record operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOperation {
    Create { fields: Map<String, Value> },
    Get { id: String },
    List { limit: u32, offset: u32 },
    Update { id: String, fields: Map<String, Value> },
    Delete { id: String },
}

impl RecordOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            RecordOperation::Create { .. } => OperationKind::Create,
            RecordOperation::Get { .. } => OperationKind::Get,
            RecordOperation::List { .. } => OperationKind::List,
            RecordOperation::Update { .. } => OperationKind::Update,
            RecordOperation::Delete { .. } => OperationKind::Delete,
        }
    }
}

/// Per-item parameters for a record operation.
///
/// The operation stays a string until [`RecordRequest::resolve`] so that a
/// bad value fails only its own item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default, alias = "id")]
    pub record_id: Option<String>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl RecordRequest {
    pub fn resolve(&self) -> Result<RecordOperation, FysoError> {
        let kind: OperationKind = self.operation.parse()?;

        if self.entity.trim().is_empty() {
            return Err(FysoError::MissingParameter("entity"));
        }
        self.tenant()?;

        let op = match kind {
            OperationKind::Create => RecordOperation::Create {
                fields: self.fields.clone().unwrap_or_default(),
            },
            OperationKind::Get => RecordOperation::Get { id: self.require_id()? },
            OperationKind::List => RecordOperation::List {
                limit: self.limit.unwrap_or(DEFAULT_LIMIT),
                offset: self.offset.unwrap_or(0),
            },
            OperationKind::Update => RecordOperation::Update {
                id: self.require_id()?,
                fields: self.fields.clone().unwrap_or_default(),
            },
            OperationKind::Delete => RecordOperation::Delete { id: self.require_id()? },
        };

        Ok(op)
    }

    /// Tenant the request runs under; record calls need a tenant token.
    pub fn tenant(&self) -> Result<&str, FysoError> {
        self.tenant_id
            .as_deref()
            .map(str::trim)
            .filter(|tenant| !tenant.is_empty())
            .ok_or(FysoError::MissingParameter("tenantId"))
    }

    fn require_id(&self) -> Result<String, FysoError> {
        self.record_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or(FysoError::MissingParameter("recordId"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(op: &str) -> RecordRequest {
        RecordRequest {
            tenant_id: Some("t-1".into()),
            entity: "contacts".into(),
            operation: op.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_operation_kind() {
        assert_eq!("create".parse::<OperationKind>().unwrap(), OperationKind::Create);
        assert_eq!("LIST".parse::<OperationKind>().unwrap(), OperationKind::List);
        assert_eq!("getAll".parse::<OperationKind>().unwrap(), OperationKind::List);

        let err = "upsert".parse::<OperationKind>().unwrap_err();
        assert!(matches!(err, FysoError::UnknownOperation(ref op) if op == "upsert"));
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(
            request("list").resolve().unwrap(),
            RecordOperation::List { limit: 50, offset: 0 }
        );
        assert_eq!(
            request("create").resolve().unwrap(),
            RecordOperation::Create { fields: Map::new() }
        );
    }

    #[test]
    fn test_resolve_requires_id() {
        for op in ["get", "update", "delete"] {
            let err = request(op).resolve().unwrap_err();
            assert!(matches!(err, FysoError::MissingParameter("recordId")), "{op}");
        }

        let mut req = request("delete");
        req.record_id = Some("  ".into());
        assert!(req.resolve().is_err());

        req.record_id = Some("r1".into());
        assert_eq!(req.resolve().unwrap(), RecordOperation::Delete { id: "r1".into() });
    }

    #[test]
    fn test_resolve_requires_entity() {
        let mut req = request("list");
        req.entity = String::new();
        assert!(matches!(req.resolve(), Err(FysoError::MissingParameter("entity"))));
    }

    #[test]
    fn test_resolve_requires_tenant() {
        let mut req = request("list");
        req.tenant_id = None;
        assert!(matches!(req.resolve(), Err(FysoError::MissingParameter("tenantId"))));

        req.tenant_id = Some(" ".into());
        assert!(matches!(req.resolve(), Err(FysoError::MissingParameter("tenantId"))));

        req.tenant_id = Some(" t-1 ".into());
        assert_eq!(req.tenant().unwrap(), "t-1");
    }

    #[test]
    fn test_deserialize_request_line() {
        let req: RecordRequest = serde_json::from_str(
            r#"{"operation": "update", "tenantId": "t-1", "entity": "contacts", "id": "r9", "fields": {"name": "Ada"}}"#,
        )
        .unwrap();
        let op = req.resolve().unwrap();
        assert_eq!(op.kind(), OperationKind::Update);
        match op {
            RecordOperation::Update { id, fields } => {
                assert_eq!(id, "r9");
                assert_eq!(fields["name"], "Ada");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_item_shape() {
        let item = Item::error("boom");
        assert_eq!(item.json, json!({"error": "boom"}));
        assert_eq!(serde_json::to_value(&item).unwrap(), json!({"json": {"error": "boom"}}));
    }
}
