//! Entity and field metadata.
//!
//! Remote schemas carry a loose type tag per field; [`EntityField`] is the
//! normalized shape used for field-mapping tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tenant-scoped data model, as listed by `GET /api/metadata/entities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Entity {
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Generic field types understood by mapping UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "date-time")]
    DateTime,
    #[serde(rename = "options")]
    Options,
}

impl FieldType {
    /// Map a remote type tag. Unknown tags fall back to `String`.
    pub fn from_remote(tag: &str) -> Self {
        match tag {
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::DateTime,
            "select" => FieldType::Options,
            _ => FieldType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::DateTime => "date-time",
            FieldType::Options => "options",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable value of an `options` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

/// A normalized entity field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityField {
    pub id: String,
    pub display_name: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

// Remote schema types
#[derive(Debug, Deserialize)]
pub(crate) struct RemoteSchema {
    #[serde(default)]
    pub fields: Vec<RemoteField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoteField {
    #[serde(alias = "key")]
    pub name: String,
    #[serde(default, alias = "label")]
    pub display_name: Option<String>,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<RemoteOption>,
}

/// Select options come either as bare strings or as `{value, label}` pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RemoteOption {
    Plain(String),
    Pair { value: Value, label: Option<String> },
}

impl RemoteOption {
    fn flatten(self) -> FieldOption {
        match self {
            RemoteOption::Plain(s) => FieldOption {
                label: s.clone(),
                value: s,
            },
            RemoteOption::Pair { value, label } => {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                FieldOption {
                    label: label.unwrap_or_else(|| value.clone()),
                    value,
                }
            }
        }
    }
}

impl From<RemoteField> for EntityField {
    fn from(field: RemoteField) -> Self {
        let field_type = FieldType::from_remote(field.field_type.as_deref().unwrap_or("string"));
        let options = if field_type == FieldType::Options {
            field.options.into_iter().map(RemoteOption::flatten).collect()
        } else {
            Vec::new()
        };

        EntityField {
            display_name: field
                .display_name
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| field.name.clone()),
            id: field.name,
            field_type,
            required: field.required,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(json: &str) -> EntityField {
        serde_json::from_str::<RemoteField>(json).unwrap().into()
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(FieldType::from_remote("number"), FieldType::Number);
        assert_eq!(FieldType::from_remote("boolean"), FieldType::Boolean);
        assert_eq!(FieldType::from_remote("date"), FieldType::DateTime);
        assert_eq!(FieldType::from_remote("select"), FieldType::Options);
        assert_eq!(FieldType::from_remote("text"), FieldType::String);
        assert_eq!(FieldType::from_remote("relation"), FieldType::String);
        assert_eq!(FieldType::DateTime.to_string(), "date-time");
    }

    #[test]
    fn test_select_with_plain_options() {
        let f = field(r#"{"name": "status", "type": "select", "options": ["a", "b"]}"#);
        assert_eq!(f.field_type, FieldType::Options);
        assert_eq!(
            f.options,
            vec![
                FieldOption { label: "a".into(), value: "a".into() },
                FieldOption { label: "b".into(), value: "b".into() },
            ]
        );
    }

    #[test]
    fn test_select_with_pairs() {
        let f = field(
            r#"{"name": "prio", "displayName": "Priority", "type": "select", "required": true,
                "options": [{"value": "hi", "label": "High"}, {"value": 3}, "low"]}"#,
        );
        assert_eq!(f.display_name, "Priority");
        assert!(f.required);
        assert_eq!(f.options[0], FieldOption { label: "High".into(), value: "hi".into() });
        assert_eq!(f.options[1], FieldOption { label: "3".into(), value: "3".into() });
        assert_eq!(f.options[2], FieldOption { label: "low".into(), value: "low".into() });
    }

    #[test]
    fn test_missing_type_and_display_name() {
        let f = field(r#"{"key": "title"}"#);
        assert_eq!(f.id, "title");
        assert_eq!(f.display_name, "title");
        assert_eq!(f.field_type, FieldType::String);
        assert!(!f.required);
        assert!(f.options.is_empty());
    }

    #[test]
    fn test_entity_label() {
        let e: Entity = serde_json::from_str(r#"{"name": "invoices", "displayName": "Invoices"}"#).unwrap();
        assert_eq!(e.display_label(), "Invoices");
        let e: Entity = serde_json::from_str(r#"{"name": "invoices"}"#).unwrap();
        assert_eq!(e.display_label(), "invoices");
    }
}
