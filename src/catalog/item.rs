use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::DocumentId;

/// A locally owned catalog record.
///
/// The `id`, `parent_id`, and `remote_id` fields are local-only identity:
/// they are never embedded in a published envelope payload, so a downloaded
/// document can never overwrite unrelated local identity or tree position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique local identifier, assigned at creation.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Arbitrary domain content.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub payload: Map<String, Value>,

    /// Tree position within the catalog; `None` means catalog root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Identifier of the remote document most recently produced by a push
    /// of this item. Absent until the first successful push.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<DocumentId>,
}

impl CatalogItem {
    /// Create a new item at catalog root with a fresh local id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            payload: Map::new(),
            parent_id: None,
            remote_id: None,
        }
    }

    /// Set the domain payload.
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Set the parent reference.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_has_fresh_identity_at_root() {
        let a = CatalogItem::new("Protagonist");
        let b = CatalogItem::new("Protagonist");

        assert_ne!(a.id, b.id);
        assert_eq!(a.parent_id, None);
        assert_eq!(a.remote_id, None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut payload = Map::new();
        payload.insert("mood".to_string(), Value::String("wry".to_string()));

        let item = CatalogItem::new("Narrator").with_payload(payload);
        let json = serde_json::to_string(&item).unwrap();
        let back: CatalogItem = serde_json::from_str(&json).unwrap();

        assert_eq!(back, item);
    }

    #[test]
    fn test_absent_optional_fields_are_omitted() {
        let item = CatalogItem::new("Sidekick");
        let json = serde_json::to_string(&item).unwrap();

        assert!(!json.contains("parent_id"));
        assert!(!json.contains("remote_id"));
    }
}
