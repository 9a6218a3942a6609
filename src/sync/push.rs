//! Push: publish one local item to the remote store.

use chrono::Utc;

use crate::store::{DocumentId, CATALOG_DOC_MARKER};

use super::envelope::encode;
use super::error::{Result, SyncError};
use super::SyncEngine;

/// Derive a remote document name from the context tag, item name, and the
/// current time.
///
/// Collision avoidance only: the name is never an identity key for future
/// updates, the item's `remote_id` is.
pub fn document_name(context: &str, item_name: &str) -> String {
    format!(
        "{}{}-{}-{}.json",
        CATALOG_DOC_MARKER,
        context,
        slug(item_name),
        Utc::now().timestamp_millis()
    )
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

impl SyncEngine {
    /// Publish one catalog item to the remote store.
    ///
    /// If the item already carries a `remote_id`, the same remote document
    /// is updated in place; otherwise a new document is created. On success
    /// the item's `remote_id` is written back and the catalog's full item
    /// set is persisted. On failure the error propagates unmodified and the
    /// local item is left untouched.
    pub async fn push(&self, context: &str, item_id: &str) -> Result<DocumentId> {
        let token = self.token()?;

        let catalog = self
            .registry()
            .get(context)
            .ok_or_else(|| SyncError::UnknownContext(context.to_string()))?;

        let mut items = catalog.items().await?;
        let item = items
            .iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| SyncError::ItemNotFound {
                context: context.to_string(),
                id: item_id.to_string(),
            })?
            .clone();

        let bytes = encode(&item, context);
        let name = document_name(context, &item.name);

        let folder = self.store().ensure_folder(token).await?;
        let document = self
            .store()
            .upload(token, &folder, &name, bytes, item.remote_id.as_ref())
            .await?;

        // Write the remote identifier back and persist the full item set.
        if let Some(stored) = items.iter_mut().find(|i| i.id == item_id) {
            stored.remote_id = Some(document.clone());
        }
        catalog.persist_items(items).await?;

        log::debug!(
            "pushed item {} from '{}' as document {}",
            item_id,
            context,
            document
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Map, Value};

    use crate::catalog::{Catalog, CatalogItem, CatalogRegistry, MemoryCatalog};
    use crate::store::{AccessToken, MemoryRemoteStore, StoreError};
    use crate::sync::envelope::decode;
    use crate::sync::{SyncEngine, SyncError};

    fn token() -> Option<AccessToken> {
        Some(AccessToken::new("test-token"))
    }

    fn engine_with_item(
        store: Arc<MemoryRemoteStore>,
        item: CatalogItem,
    ) -> (SyncEngine, Arc<MemoryCatalog>, String) {
        let item_id = item.id.clone();
        let catalog = Arc::new(MemoryCatalog::with_items("characters", vec![item]));
        let mut registry = CatalogRegistry::new();
        registry.register(catalog.clone());
        (SyncEngine::new(store, registry, token()), catalog, item_id)
    }

    #[tokio::test]
    async fn test_push_creates_document_and_records_remote_id() {
        let store = Arc::new(MemoryRemoteStore::new());
        let mut payload = Map::new();
        payload.insert("voice".to_string(), Value::from("dry"));
        let item = CatalogItem::new("Narrator").with_payload(payload);
        let (engine, catalog, item_id) = engine_with_item(store.clone(), item);

        let document = engine.push("characters", &item_id).await.unwrap();

        assert_eq!(store.document_count(), 1);
        let items = catalog.items().await.unwrap();
        assert_eq!(items[0].remote_id, Some(document.clone()));
        assert_eq!(catalog.persist_calls(), 1);

        // The published envelope carries no local identity
        let envelope = decode(&store.document_bytes(&document).unwrap()).unwrap();
        assert_eq!(envelope.catalog_context, "characters");
        assert!(!envelope.root.contains_key("id"));
        assert!(!envelope.root.contains_key("remote_id"));
        assert_eq!(envelope.root.get("voice"), Some(&Value::from("dry")));
    }

    #[tokio::test]
    async fn test_push_twice_updates_not_duplicates() {
        let store = Arc::new(MemoryRemoteStore::new());
        let item = CatalogItem::new("Narrator");
        let (engine, _catalog, item_id) = engine_with_item(store.clone(), item);

        let first = engine.push("characters", &item_id).await.unwrap();
        let second = engine.push("characters", &item_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.document_count(), 1);
    }

    #[tokio::test]
    async fn test_push_without_credential_makes_no_store_calls() {
        let store = Arc::new(MemoryRemoteStore::new());
        let item = CatalogItem::new("Narrator");
        let item_id = item.id.clone();
        let catalog = Arc::new(MemoryCatalog::with_items("characters", vec![item]));
        let mut registry = CatalogRegistry::new();
        registry.register(catalog);
        let engine = SyncEngine::new(store.clone(), registry, None);

        let result = engine.push("characters", &item_id).await;

        assert!(matches!(result, Err(SyncError::MissingCredential)));
        assert_eq!(store.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_push_unknown_context_fails() {
        let store = Arc::new(MemoryRemoteStore::new());
        let engine = SyncEngine::new(store, CatalogRegistry::new(), token());

        let result = engine.push("scenes", "some-id").await;
        assert!(matches!(result, Err(SyncError::UnknownContext(_))));
    }

    #[tokio::test]
    async fn test_push_missing_item_fails() {
        let store = Arc::new(MemoryRemoteStore::new());
        let (engine, _catalog, _item_id) = engine_with_item(store, CatalogItem::new("Narrator"));

        let result = engine.push("characters", "no-such-id").await;
        assert!(matches!(result, Err(SyncError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_push_failure_leaves_item_untouched() {
        let store = Arc::new(MemoryRemoteStore::with_rejected_token("test-token"));
        let item = CatalogItem::new("Narrator");
        let (engine, catalog, item_id) = engine_with_item(store, item);

        let result = engine.push("characters", &item_id).await;

        assert!(matches!(result, Err(SyncError::Store(StoreError::Auth))));
        let items = catalog.items().await.unwrap();
        assert_eq!(items[0].remote_id, None);
        assert_eq!(catalog.persist_calls(), 0);
    }

    #[test]
    fn test_document_name_shape() {
        let name = super::document_name("characters", "The Narrator!");
        assert!(name.starts_with("dscat_characters-the-narrator-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_slug_of_symbols_only_name() {
        let name = super::document_name("presets", "!!!");
        assert!(name.starts_with("dscat_presets-item-"));
    }
}
