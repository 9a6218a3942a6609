use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::Catalog;

/// A capability table mapping context tags to catalog handles.
///
/// The sync engine routes incoming documents by looking up their context
/// tag here; new catalogs register by adding an entry, requiring no change
/// to the engine.
#[derive(Default, Clone)]
pub struct CatalogRegistry {
    catalogs: HashMap<String, Arc<dyn Catalog>>,
}

impl CatalogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog under its own context tag.
    ///
    /// Replaces any previous entry for the same tag.
    pub fn register(&mut self, catalog: Arc<dyn Catalog>) {
        self.catalogs
            .insert(catalog.context().to_string(), catalog);
    }

    /// Look up a catalog by context tag.
    pub fn get(&self, context: &str) -> Option<&Arc<dyn Catalog>> {
        self.catalogs.get(context)
    }

    /// Whether a context tag is registered.
    pub fn contains(&self, context: &str) -> bool {
        self.catalogs.contains_key(context)
    }

    /// All registered context tags, sorted for deterministic output.
    pub fn contexts(&self) -> Vec<&str> {
        let mut contexts: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        contexts.sort_unstable();
        contexts
    }

    /// Number of registered catalogs.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CatalogRegistry::new();
        registry.register(Arc::new(MemoryCatalog::new("characters")));
        registry.register(Arc::new(MemoryCatalog::new("presets")));

        assert!(registry.contains("characters"));
        assert!(!registry.contains("scenes"));
        assert_eq!(registry.contexts(), vec!["characters", "presets"]);
    }

    #[test]
    fn test_register_replaces_same_context() {
        let mut registry = CatalogRegistry::new();
        registry.register(Arc::new(MemoryCatalog::new("characters")));
        registry.register(Arc::new(MemoryCatalog::new("characters")));

        assert_eq!(registry.len(), 1);
    }
}
