use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::remote_store::{
    AccessToken, DocumentId, DocumentMeta, FolderId, RemoteStore, Result, StoreError,
    APP_FOLDER_NAME, CATALOG_DOC_MARKER,
};

/// An in-memory implementation of [`RemoteStore`], intended primarily for
/// testing.
///
/// Supports fault injection: a token the store rejects, and document ids
/// whose download always fails.
pub struct MemoryRemoteStore {
    inner: RwLock<Inner>,
    rejected_token: Option<String>,
}

struct Inner {
    folders: HashMap<FolderId, String>,
    documents: HashMap<DocumentId, StoredDocument>,
    failing_downloads: HashSet<DocumentId>,
    next_id: u64,
    calls: CallCounts,
}

struct StoredDocument {
    folder: FolderId,
    name: String,
    bytes: Vec<u8>,
}

/// Number of times each store operation has been invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub ensure_folder: usize,
    pub list_documents: usize,
    pub download: usize,
    pub upload: usize,
}

impl CallCounts {
    /// Total calls across all operations.
    pub fn total(&self) -> usize {
        self.ensure_folder + self.list_documents + self.download + self.upload
    }
}

impl MemoryRemoteStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                folders: HashMap::new(),
                documents: HashMap::new(),
                failing_downloads: HashSet::new(),
                next_id: 1,
                calls: CallCounts::default(),
            }),
            rejected_token: None,
        }
    }

    /// Create a store that rejects the given token with `StoreError::Auth`.
    pub fn with_rejected_token(token: impl Into<String>) -> Self {
        Self {
            rejected_token: Some(token.into()),
            ..Self::new()
        }
    }

    /// Seed a document directly into the application folder.
    pub fn seed_document(&self, name: impl Into<String>, bytes: Vec<u8>) -> DocumentId {
        let mut inner = self.inner.write().unwrap();
        let folder = inner.folder_by_name(APP_FOLDER_NAME);
        let id = inner.fresh_id("doc");
        inner.documents.insert(
            id.clone(),
            StoredDocument {
                folder,
                name: name.into(),
                bytes,
            },
        );
        id
    }

    /// Make all future downloads of the given document fail.
    pub fn fail_download(&self, document: &DocumentId) {
        let mut inner = self.inner.write().unwrap();
        inner.failing_downloads.insert(document.clone());
    }

    /// Snapshot of per-operation call counts.
    pub fn calls(&self) -> CallCounts {
        self.inner.read().unwrap().calls
    }

    /// Number of documents currently stored.
    pub fn document_count(&self) -> usize {
        self.inner.read().unwrap().documents.len()
    }

    /// The stored bytes of a document, if it exists.
    pub fn document_bytes(&self, document: &DocumentId) -> Option<Vec<u8>> {
        let inner = self.inner.read().unwrap();
        inner.documents.get(document).map(|d| d.bytes.clone())
    }

    fn check_token(&self, token: &AccessToken) -> Result<()> {
        match &self.rejected_token {
            Some(rejected) if token.secret() == rejected => Err(StoreError::Auth),
            _ => Ok(()),
        }
    }
}

impl Inner {
    fn fresh_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    fn folder_by_name(&mut self, name: &str) -> FolderId {
        if let Some((id, _)) = self.folders.iter().find(|(_, n)| n.as_str() == name) {
            return id.clone();
        }
        let id = self.fresh_id("folder");
        self.folders.insert(id.clone(), name.to_string());
        id
    }
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn ensure_folder(&self, token: &AccessToken) -> Result<FolderId> {
        self.check_token(token)?;
        let mut inner = self.inner.write().unwrap();
        inner.calls.ensure_folder += 1;
        Ok(inner.folder_by_name(APP_FOLDER_NAME))
    }

    async fn list_documents(
        &self,
        token: &AccessToken,
        folder: &FolderId,
    ) -> Result<Vec<DocumentMeta>> {
        self.check_token(token)?;
        let mut inner = self.inner.write().unwrap();
        inner.calls.list_documents += 1;

        if !inner.folders.contains_key(folder) {
            return Err(StoreError::NotFound);
        }

        let mut metas: Vec<DocumentMeta> = inner
            .documents
            .iter()
            .filter(|(_, d)| d.folder == *folder && d.name.contains(CATALOG_DOC_MARKER))
            .map(|(id, d)| DocumentMeta {
                id: id.clone(),
                name: d.name.clone(),
            })
            .collect();

        // Deterministic listing order for tests
        metas.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(metas)
    }

    async fn download(&self, token: &AccessToken, document: &DocumentId) -> Result<Vec<u8>> {
        self.check_token(token)?;
        let mut inner = self.inner.write().unwrap();
        inner.calls.download += 1;

        if inner.failing_downloads.contains(document) {
            return Err(StoreError::Fetch("injected download failure".to_string()));
        }

        inner
            .documents
            .get(document)
            .map(|d| d.bytes.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn upload(
        &self,
        token: &AccessToken,
        folder: &FolderId,
        name: &str,
        bytes: Vec<u8>,
        existing: Option<&DocumentId>,
    ) -> Result<DocumentId> {
        self.check_token(token)?;
        let mut inner = self.inner.write().unwrap();
        inner.calls.upload += 1;

        match existing {
            Some(document) => {
                let stored = inner
                    .documents
                    .get_mut(document)
                    .ok_or_else(|| StoreError::Upload(format!("no such document: {}", document)))?;
                stored.bytes = bytes;
                Ok(document.clone())
            }
            None => {
                if !inner.folders.contains_key(folder) {
                    return Err(StoreError::Upload(format!("no such folder: {}", folder)));
                }
                let id = inner.fresh_id("doc");
                inner.documents.insert(
                    id.clone(),
                    StoredDocument {
                        folder: folder.clone(),
                        name: name.to_string(),
                        bytes,
                    },
                );
                Ok(id)
            }
        }
    }
}
