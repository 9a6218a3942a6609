use serde::{Deserialize, Serialize};

use async_trait::async_trait;

/// Identifier of a folder in the remote store, as issued by the store.
pub type FolderId = String;

/// Identifier of a document in the remote store.
///
/// This is the stable handle that must be reused on update so that a
/// re-published item replaces its existing document instead of creating
/// a second one.
pub type DocumentId = String;

/// Name of the application-reserved folder in the remote store.
pub const APP_FOLDER_NAME: &str = "draftsync";

/// Marker that catalog document names must contain.
///
/// The listing operation filters on this marker, so documents unrelated to
/// catalog sync that happen to live in the application folder are ignored.
pub const CATALOG_DOC_MARKER: &str = "dscat_";

/// An opaque bearer token for the remote store.
///
/// The token is externally supplied and read-only; this subsystem never
/// refreshes or persists it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw token value, for constructing Authorization headers.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Metadata for a document in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// The store-issued document identifier.
    pub id: DocumentId,
    /// The document name.
    pub name: String,
}

/// Error type for remote store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the supplied credential.
    #[error("remote store rejected the access token")]
    Auth,

    /// The folder or document was not found.
    #[error("not found")]
    NotFound,

    /// A transport or protocol failure while fetching.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A transport or protocol failure while uploading.
    #[error("upload failed: {0}")]
    Upload(String),

    /// A custom error message.
    #[error("{0}")]
    Other(String),
}

/// Result type for remote store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The client contract for the remote file store.
///
/// Four stateless operations against a single application-owned folder.
/// Pure I/O; retry and reconciliation policy live in the sync engine.
/// Every operation requires a caller-supplied credential.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Look up the application folder by its reserved name, creating it if
    /// absent. Best-effort singleton: the store is not required to guard
    /// against concurrent first-time creation.
    async fn ensure_folder(&self, token: &AccessToken) -> Result<FolderId>;

    /// List metadata for all catalog documents under the folder.
    ///
    /// Only documents whose name contains [`CATALOG_DOC_MARKER`] are
    /// returned. An empty list is valid, not an error.
    async fn list_documents(
        &self,
        token: &AccessToken,
        folder: &FolderId,
    ) -> Result<Vec<DocumentMeta>>;

    /// Fetch the full content of a document.
    async fn download(&self, token: &AccessToken, document: &DocumentId) -> Result<Vec<u8>>;

    /// Create or replace a document.
    ///
    /// When `existing` is `None` a new document is created under `folder`
    /// with the given name. Otherwise the content of the identified document
    /// is replaced in place, preserving its identifier.
    async fn upload(
        &self,
        token: &AccessToken,
        folder: &FolderId,
        name: &str,
        bytes: Vec<u8>,
        existing: Option<&DocumentId>,
    ) -> Result<DocumentId>;
}
