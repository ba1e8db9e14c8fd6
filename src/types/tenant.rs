use serde::{Deserialize, Serialize};

use super::remote_id::deserialize_id;

/// A tenant the account can act in, as returned by `GET /api/auth/tenants`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Tenant {
    /// Label shown in selection lists, e.g. "Acme (acme)".
    pub fn display_label(&self) -> String {
        match self.slug.as_deref().filter(|s| !s.is_empty()) {
            Some(slug) if !self.name.is_empty() => format!("{} ({})", self.name, slug),
            Some(slug) => slug.to_string(),
            None if self.name.is_empty() => self.id.clone(),
            None => self.name.clone(),
        }
    }
}

/// One entry of a dynamic selection list (tenant picker, entity picker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        let t: Tenant =
            serde_json::from_str(r#"{"id": 1, "name": "Acme", "slug": "acme"}"#).unwrap();
        assert_eq!(t.id, "1");
        assert_eq!(t.display_label(), "Acme (acme)");

        let t: Tenant = serde_json::from_str(r#"{"id": "t2", "name": "Beta"}"#).unwrap();
        assert_eq!(t.display_label(), "Beta");

        let t: Tenant = serde_json::from_str(r#"{"id": "t3", "slug": "gamma"}"#).unwrap();
        assert_eq!(t.display_label(), "gamma");

        let t: Tenant = serde_json::from_str(r#"{"id": "t4"}"#).unwrap();
        assert_eq!(t.display_label(), "t4");
    }
}
