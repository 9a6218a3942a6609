use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::catalog::CatalogItem;
use crate::store::DocumentId;

/// Marker identifying documents produced by this application family.
///
/// Informational by default: the context tag is the load-bearing routing
/// field. Strict mode (see `SyncOptions`) rejects mismatched markers.
pub const APP_MARKER: &str = "draftsync";

/// Payload keys that carry local-only identity and are stripped on both
/// encode and decode.
const LOCAL_ONLY_KEYS: [&str; 3] = ["id", "parent_id", "remote_id"];

/// Error type for envelope decoding.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The document body is not valid JSON or lacks required fields.
    #[error("invalid envelope: {0}")]
    Json(#[from] serde_json::Error),

    /// The app marker did not match (strict mode only).
    #[error("unexpected app marker: {0:?}")]
    MarkerMismatch(Option<String>),
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;

/// The deserialized shape of a remote catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Application marker; informational.
    #[serde(rename = "app", default, skip_serializing_if = "Option::is_none")]
    pub app_marker: Option<String>,

    /// Context tag identifying the target catalog.
    #[serde(rename = "context")]
    pub catalog_context: String,

    /// The item content: display name plus domain payload, with local-only
    /// identity fields removed.
    pub root: Map<String, Value>,
}

impl Envelope {
    /// Whether the app marker matches this application family.
    pub fn marker_matches(&self) -> bool {
        self.app_marker.as_deref() == Some(APP_MARKER)
    }

    /// Convert into a [`CatalogItem`] attached at catalog root.
    ///
    /// The item gets a fresh local id, a cleared parent reference, and its
    /// `remote_id` set to the originating document.
    pub fn into_item(mut self, remote_id: DocumentId) -> CatalogItem {
        let name = match self.root.remove("name") {
            Some(Value::String(name)) => name,
            _ => "untitled".to_string(),
        };

        CatalogItem {
            id: Uuid::new_v4().to_string(),
            name,
            payload: self.root,
            parent_id: None,
            remote_id: Some(remote_id),
        }
    }
}

/// Serialize an item into envelope bytes for the given context tag.
///
/// The root carries the item's display name and domain payload only; local
/// identity fields never cross the wire.
pub fn encode(item: &CatalogItem, context: &str) -> Vec<u8> {
    let mut root = item.payload.clone();
    for key in LOCAL_ONLY_KEYS {
        root.remove(key);
    }
    root.insert("name".to_string(), Value::String(item.name.clone()));

    let envelope = Envelope {
        app_marker: Some(APP_MARKER.to_string()),
        catalog_context: context.to_string(),
        root,
    };

    // Envelope serialization cannot fail: it is a struct of strings and an
    // already-valid JSON map.
    serde_json::to_vec_pretty(&envelope).unwrap_or_default()
}

/// Parse envelope bytes.
///
/// Local-only identity keys found in the root are dropped so an imported
/// document can never smuggle identity or tree position into a catalog.
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    let mut envelope: Envelope = serde_json::from_slice(bytes)?;
    for key in LOCAL_ONLY_KEYS {
        envelope.root.remove(key);
    }
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> CatalogItem {
        let mut payload = Map::new();
        payload.insert("voice".to_string(), Value::String("first".to_string()));
        payload.insert("age".to_string(), Value::from(42));

        let mut item = CatalogItem::new("Narrator").with_payload(payload);
        item.parent_id = Some("folder-7".to_string());
        item.remote_id = Some("doc-3".to_string());
        item
    }

    #[test]
    fn test_roundtrip_strips_local_identity() {
        let item = sample_item();
        let envelope = decode(&encode(&item, "characters")).unwrap();

        assert_eq!(envelope.catalog_context, "characters");
        assert!(envelope.marker_matches());
        assert_eq!(envelope.root.get("name"), Some(&Value::from("Narrator")));
        assert_eq!(envelope.root.get("voice"), Some(&Value::from("first")));
        assert!(!envelope.root.contains_key("id"));
        assert!(!envelope.root.contains_key("parent_id"));
        assert!(!envelope.root.contains_key("remote_id"));
    }

    #[test]
    fn test_roundtrip_preserves_payload() {
        let item = sample_item();
        let envelope = decode(&encode(&item, "characters")).unwrap();
        let imported = envelope.into_item("doc-3".to_string());

        assert_eq!(imported.name, item.name);
        assert_eq!(imported.payload, item.payload);
        assert_eq!(imported.parent_id, None);
        assert_eq!(imported.remote_id, Some("doc-3".to_string()));
        assert_ne!(imported.id, item.id);
    }

    #[test]
    fn test_decode_drops_smuggled_identity_keys() {
        let bytes = br#"{
            "app": "draftsync",
            "context": "characters",
            "root": { "name": "Impostor", "id": "steal-me", "parent_id": "x" }
        }"#;

        let envelope = decode(bytes).unwrap();
        assert!(!envelope.root.contains_key("id"));
        assert!(!envelope.root.contains_key("parent_id"));
    }

    #[test]
    fn test_decode_without_marker_still_parses() {
        let bytes = br#"{ "context": "presets", "root": { "name": "Noir" } }"#;

        let envelope = decode(bytes).unwrap();
        assert!(!envelope.marker_matches());
        assert_eq!(envelope.catalog_context, "presets");
    }

    #[test]
    fn test_decode_rejects_malformed_body() {
        assert!(decode(b"not json at all").is_err());
        assert!(decode(br#"{ "root": {} }"#).is_err()); // missing context
    }

    #[test]
    fn test_into_item_defaults_missing_name() {
        let bytes = br#"{ "context": "presets", "root": { "tone": "bleak" } }"#;
        let item = decode(bytes).unwrap().into_item("doc-1".to_string());

        assert_eq!(item.name, "untitled");
        assert_eq!(item.payload.get("tone"), Some(&Value::from("bleak")));
    }
}
