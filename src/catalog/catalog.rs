use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::item::CatalogItem;

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A custom error message.
    #[error("{0}")]
    Other(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// A named local collection of [`CatalogItem`]s sharing one context tag.
///
/// The sync engine mutates a catalog only through [`import_items`] and
/// [`persist_items`], never its internals, preserving single-writer
/// discipline per catalog.
///
/// [`import_items`]: Catalog::import_items
/// [`persist_items`]: Catalog::persist_items
#[async_trait]
pub trait Catalog: Send + Sync {
    /// The context tag identifying this catalog.
    fn context(&self) -> &str;

    /// Snapshot of the current item set.
    async fn items(&self) -> Result<Vec<CatalogItem>>;

    /// Bulk-insert items at collection root.
    ///
    /// Parent references are cleared on insert. Items whose `remote_id`
    /// already exists in the collection are skipped, which keeps repeated
    /// pulls idempotent without adopting overwrite semantics.
    async fn import_items(&self, items: Vec<CatalogItem>) -> Result<()>;

    /// Atomically replace the full item set.
    async fn persist_items(&self, items: Vec<CatalogItem>) -> Result<()>;
}

/// Clear parent references and drop items whose `remote_id` is already
/// present, preserving input order. Shared by catalog implementations.
pub(super) fn merge_imported(existing: &[CatalogItem], incoming: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let known: Vec<&str> = existing
        .iter()
        .filter_map(|i| i.remote_id.as_deref())
        .collect();

    incoming
        .into_iter()
        .filter(|item| match item.remote_id.as_deref() {
            Some(remote_id) => !known.contains(&remote_id),
            None => true,
        })
        .map(|mut item| {
            item.parent_id = None;
            item
        })
        .collect()
}

/// An in-memory implementation of [`Catalog`], intended primarily for
/// testing. Records how many times each mutating operation was invoked.
pub struct MemoryCatalog {
    context: String,
    items: RwLock<Vec<CatalogItem>>,
    import_calls: AtomicUsize,
    persist_calls: AtomicUsize,
}

impl MemoryCatalog {
    /// Create a new empty catalog for the given context tag.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            items: RwLock::new(Vec::new()),
            import_calls: AtomicUsize::new(0),
            persist_calls: AtomicUsize::new(0),
        }
    }

    /// Create a catalog pre-populated with items.
    pub fn with_items(context: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        let catalog = Self::new(context);
        *catalog.items.write().unwrap() = items;
        catalog
    }

    /// Number of times `import_items` has been invoked.
    pub fn import_calls(&self) -> usize {
        self.import_calls.load(Ordering::SeqCst)
    }

    /// Number of times `persist_items` has been invoked.
    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    fn context(&self) -> &str {
        &self.context
    }

    async fn items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.read().unwrap().clone())
    }

    async fn import_items(&self, items: Vec<CatalogItem>) -> Result<()> {
        self.import_calls.fetch_add(1, Ordering::SeqCst);
        let mut current = self.items.write().unwrap();
        let merged = merge_imported(&current, items);
        current.extend(merged);
        Ok(())
    }

    async fn persist_items(&self, items: Vec<CatalogItem>) -> Result<()> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        *self.items.write().unwrap() = items;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_import_inserts_at_root() {
        let catalog = MemoryCatalog::new("characters");
        let item = CatalogItem::new("Antagonist").with_parent("some-parent");

        catalog.import_items(vec![item]).await.unwrap();

        let items = catalog.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].parent_id, None);
    }

    #[tokio::test]
    async fn test_import_skips_known_remote_ids() {
        let mut existing = CatalogItem::new("Narrator");
        existing.remote_id = Some("doc-1".to_string());
        let catalog = MemoryCatalog::with_items("characters", vec![existing]);

        let mut duplicate = CatalogItem::new("Narrator");
        duplicate.remote_id = Some("doc-1".to_string());
        let mut fresh = CatalogItem::new("Sidekick");
        fresh.remote_id = Some("doc-2".to_string());

        catalog.import_items(vec![duplicate, fresh]).await.unwrap();

        let items = catalog.items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Sidekick");
    }

    #[tokio::test]
    async fn test_persist_replaces_full_set() {
        let catalog =
            MemoryCatalog::with_items("presets", vec![CatalogItem::new("a"), CatalogItem::new("b")]);

        catalog
            .persist_items(vec![CatalogItem::new("c")])
            .await
            .unwrap();

        let items = catalog.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "c");
        assert_eq!(catalog.persist_calls(), 1);
    }
}
