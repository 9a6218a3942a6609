//! Top-level application component.
//!
//! The [`App`] owns the loaded configuration and is the root for wiring the
//! remote store, the catalog registry, and the sync engine together.

use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{CatalogRegistry, FileCatalog};
use crate::config::{read_config, resolve_token, Config, ConfigError, ConfigSource};
use crate::store::{AccessToken, HttpRemoteStore, RemoteStore};
use crate::sync::{SyncEngine, SyncOptions};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during App operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The remote store is not configured.
    #[error("store.base_url is not configured")]
    StoreNotConfigured,

    /// I/O error preparing local state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for App operations.
pub type Result<T> = std::result::Result<T, AppError>;

// =============================================================================
// Context Types
// =============================================================================

/// Context for creating an App.
#[derive(Default)]
pub struct AppContext {
    /// Source for configuration files.
    pub config_source: ConfigSource,
}

// =============================================================================
// App
// =============================================================================

/// The application root.
pub struct App {
    config: Config,
}

impl App {
    /// Create an App, reading configuration from the given context.
    pub fn new(context: AppContext) -> Result<Self> {
        let config = read_config(&context.config_source)?;
        Ok(Self { config })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the remote store access token, if any is configured.
    pub fn resolve_token(&self) -> Result<Option<AccessToken>> {
        Ok(resolve_token(&self.config.store)?)
    }

    /// Create the remote store client.
    pub fn create_store(&self) -> Result<Arc<dyn RemoteStore>> {
        if self.config.store.base_url.is_empty() {
            return Err(AppError::StoreNotConfigured);
        }
        Ok(Arc::new(HttpRemoteStore::new(&self.config.store.base_url)))
    }

    /// Create the catalog registry from the configured contexts.
    ///
    /// Ensures the catalogs directory exists; each context gets a
    /// file-backed catalog under it.
    pub async fn create_registry(&self) -> Result<CatalogRegistry> {
        tokio::fs::create_dir_all(&self.config.catalogs.dir).await?;

        let mut registry = CatalogRegistry::new();
        for context in &self.config.catalogs.contexts {
            registry.register(Arc::new(FileCatalog::new(
                &self.config.catalogs.dir,
                context.as_str(),
            )));
        }
        Ok(registry)
    }

    /// Create a sync engine wired from configuration.
    pub async fn create_engine(&self) -> Result<SyncEngine> {
        let store = self.create_store()?;
        let registry = self.create_registry().await?;
        let token = self.resolve_token()?;

        Ok(SyncEngine::new(store, registry, token).with_options(SyncOptions {
            max_concurrent_downloads: self.config.sync.max_concurrent_downloads,
            strict_marker: self.config.sync.strict_marker,
        }))
    }
}
