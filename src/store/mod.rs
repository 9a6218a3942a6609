//! Remote Store Client.
//!
//! Isolates all remote-store protocol detail behind the four-operation
//! [`RemoteStore`] contract: ensure the application folder, list catalog
//! documents, download bytes, upload/replace bytes. No retry or
//! reconciliation policy lives here.

mod http_store;
mod memory_store;
mod remote_store;

pub use http_store::HttpRemoteStore;
pub use memory_store::{CallCounts, MemoryRemoteStore};
pub use remote_store::{
    AccessToken, DocumentId, DocumentMeta, FolderId, RemoteStore, Result, StoreError,
    APP_FOLDER_NAME, CATALOG_DOC_MARKER,
};
