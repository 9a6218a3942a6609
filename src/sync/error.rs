//! Error types for sync operations.

use crate::catalog::CatalogError;
use crate::store::StoreError;

use super::envelope::EnvelopeError;

/// Error type for sync operations.
///
/// These are the fatal errors that abort a pull or push as a whole.
/// Per-document failures during pull are not errors at this level; they are
/// collected as [`DocumentFailure`] entries in the pull report.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No access token is configured. Checked before any remote call.
    #[error("no access token configured")]
    MissingCredential,

    /// Remote store error.
    #[error("remote store error: {0}")]
    Store(#[from] StoreError),

    /// The context tag has no registered catalog (push only; pull skips
    /// unknown contexts silently).
    #[error("unknown catalog context: {0}")]
    UnknownContext(String),

    /// The item to push does not exist in its catalog.
    #[error("item {id} not found in catalog '{context}'")]
    ItemNotFound { context: String, id: String },

    /// Local catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Why a single document was skipped during pull.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The download failed.
    #[error("download failed: {0}")]
    Fetch(#[from] StoreError),

    /// The body did not decode as a catalog envelope.
    #[error("decode failed: {0}")]
    Decode(#[from] EnvelopeError),
}

/// A per-document failure recorded against one remote document.
///
/// Never aborts processing of the remaining documents.
#[derive(Debug)]
pub struct DocumentFailure {
    /// The remote document name.
    pub name: String,
    /// What went wrong.
    pub error: DocumentError,
}
