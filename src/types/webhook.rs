use serde::{Deserialize, Serialize};

/// Record events a subscription can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a webhook subscription should watch and where it should deliver.
#[derive(Debug, Clone)]
pub struct SubscriptionTarget {
    pub tenant_id: Option<String>,
    pub entity: String,
    pub events: Vec<EventKind>,
    pub callback_url: String,
}

impl SubscriptionTarget {
    /// Event kinds without duplicates, in first-seen order.
    pub fn event_types(&self) -> Vec<EventKind> {
        let mut seen = Vec::with_capacity(self.events.len());
        for event in &self.events {
            if !seen.contains(event) {
                seen.push(*event);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types_dedup() {
        let target = SubscriptionTarget {
            tenant_id: None,
            entity: "contacts".into(),
            events: vec![EventKind::Updated, EventKind::Created, EventKind::Updated],
            callback_url: "https://hooks.example.com/x".into(),
        };
        assert_eq!(target.event_types(), vec![EventKind::Updated, EventKind::Created]);
        assert_eq!(serde_json::to_string(&target.event_types()).unwrap(), r#"["updated","created"]"#);
    }
}
