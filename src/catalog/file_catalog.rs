use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::catalog::{merge_imported, Catalog, Result};
use super::item::CatalogItem;

/// A [`Catalog`] persisted as a single JSON file.
///
/// Each context tag gets one file named `{context}.json` under the
/// configured catalogs directory. A missing file is an empty catalog.
/// Replacement writes go through a temp file and rename so a crash
/// mid-write never truncates the catalog.
pub struct FileCatalog {
    context: String,
    path: PathBuf,
}

impl FileCatalog {
    /// Create a catalog handle for the given context tag, stored under `dir`.
    pub fn new(dir: impl AsRef<Path>, context: impl Into<String>) -> Self {
        let context = context.into();
        let path = dir.as_ref().join(format!("{}.json", context));
        Self { context, path }
    }

    /// The file backing this catalog.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<CatalogItem>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, items: &[CatalogItem]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for FileCatalog {
    fn context(&self) -> &str {
        &self.context
    }

    async fn items(&self) -> Result<Vec<CatalogItem>> {
        self.load().await
    }

    async fn import_items(&self, items: Vec<CatalogItem>) -> Result<()> {
        let mut current = self.load().await?;
        let merged = merge_imported(&current, items);
        if merged.is_empty() {
            return Ok(());
        }
        current.extend(merged);
        self.save(&current).await
    }

    async fn persist_items(&self, items: Vec<CatalogItem>) -> Result<()> {
        self.save(&items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path(), "characters");

        assert!(catalog.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path(), "characters");

        catalog
            .import_items(vec![CatalogItem::new("Narrator")])
            .await
            .unwrap();

        // A fresh handle reads the same file
        let reopened = FileCatalog::new(dir.path(), "characters");
        let items = reopened.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Narrator");
    }

    #[tokio::test]
    async fn test_import_clears_parent_and_skips_known_remote_ids() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path(), "presets");

        let mut first = CatalogItem::new("Noir").with_parent("folder-1");
        first.remote_id = Some("doc-9".to_string());
        catalog.import_items(vec![first]).await.unwrap();

        let mut again = CatalogItem::new("Noir");
        again.remote_id = Some("doc-9".to_string());
        catalog.import_items(vec![again]).await.unwrap();

        let items = catalog.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].parent_id, None);
    }

    #[tokio::test]
    async fn test_persist_replaces_full_set() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path(), "presets");

        catalog
            .import_items(vec![CatalogItem::new("a"), CatalogItem::new("b")])
            .await
            .unwrap();
        catalog
            .persist_items(vec![CatalogItem::new("only")])
            .await
            .unwrap();

        let items = catalog.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "only");
    }
}
