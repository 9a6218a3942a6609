//! Catalog synchronization engine.
//!
//! The policy layer reconciling local catalogs with the remote document
//! store:
//!
//! - [`SyncEngine::pull`] - list remote catalog documents, download and
//!   decode each independently, route by context tag, and hand each group
//!   to the matching catalog's import operation in one batch.
//! - [`SyncEngine::push`] - publish one local item as an envelope document
//!   with create-or-update semantics keyed on the item's remote id.
//!
//! All remote access goes through the [`RemoteStore`] contract; all catalog
//! mutation goes through the [`Catalog`](crate::catalog::Catalog) trait.

pub mod envelope;

mod error;
mod pull;
mod push;

use std::sync::Arc;

use crate::catalog::CatalogRegistry;
use crate::store::{AccessToken, RemoteStore};

pub use envelope::{decode, encode, Envelope, EnvelopeError, APP_MARKER};
pub use error::{DocumentError, DocumentFailure, Result, SyncError};
pub use pull::PullReport;
pub use push::document_name;

/// Options for sync operations.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Fan-out limit for concurrent document downloads during pull.
    pub max_concurrent_downloads: usize,
    /// Reject envelopes whose app marker does not match this application.
    pub strict_marker: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 8,
            strict_marker: false,
        }
    }
}

/// The sync orchestrator.
///
/// Holds the store client, the catalog registry, and the explicitly
/// injected credential. The credential is checked before any remote call;
/// its absence yields [`SyncError::MissingCredential`] with zero store
/// calls made.
pub struct SyncEngine {
    store: Arc<dyn RemoteStore>,
    registry: CatalogRegistry,
    token: Option<AccessToken>,
    options: SyncOptions,
}

impl SyncEngine {
    /// Create an engine with default options.
    pub fn new(
        store: Arc<dyn RemoteStore>,
        registry: CatalogRegistry,
        token: Option<AccessToken>,
    ) -> Self {
        Self {
            store,
            registry,
            token,
            options: SyncOptions::default(),
        }
    }

    /// Set sync options.
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// The catalog registry this engine routes into.
    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    pub(crate) fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    pub(crate) fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// The credential gate: every operation calls this before any I/O.
    pub(crate) fn token(&self) -> Result<&AccessToken> {
        self.token.as_ref().ok_or(SyncError::MissingCredential)
    }
}
