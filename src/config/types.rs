//! Configuration types for draftsync.
//!
//! Structures representing application configuration as parsed from an
//! INI-format config file.

use std::path::PathBuf;

/// [store] section - remote document store connection.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Base URL of the remote store API. Empty means not configured.
    pub base_url: String,
    /// Inline bearer token. Takes precedence over `token_file`.
    pub token: Option<String>,
    /// Path to a file holding the bearer token.
    pub token_file: Option<PathBuf>,
}

/// [catalogs] section - local catalog storage.
#[derive(Debug, Clone)]
pub struct CatalogsConfig {
    /// Directory holding one JSON file per catalog context.
    pub dir: PathBuf,
    /// Context tags to register at startup.
    pub contexts: Vec<String>,
}

/// [sync] section - sync engine tuning.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Fan-out limit for concurrent document downloads during pull.
    pub max_concurrent_downloads: usize,
    /// Reject envelopes whose app marker does not match this application.
    pub strict_marker: bool,
}

/// Complete application configuration as parsed from the config file.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub catalogs: CatalogsConfig,
    pub sync: SyncConfig,
}
