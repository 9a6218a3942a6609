//! draftsync - sync writing-studio content catalogs with a remote document store.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod store;
pub mod sync;

pub use catalog::{Catalog, CatalogError, CatalogItem, CatalogRegistry, FileCatalog, MemoryCatalog};

pub use store::{
    AccessToken, DocumentId, DocumentMeta, FolderId, HttpRemoteStore, MemoryRemoteStore,
    RemoteStore, StoreError,
};

pub use sync::{
    DocumentError, DocumentFailure, Envelope, PullReport, SyncEngine, SyncError, SyncOptions,
};
