use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use super::remote_store::{
    AccessToken, DocumentId, DocumentMeta, FolderId, RemoteStore, Result, StoreError,
    APP_FOLDER_NAME, CATALOG_DOC_MARKER,
};

/// An HTTP implementation of [`RemoteStore`].
///
/// Operates against a Drive-style document API: folders are looked up by
/// name, documents are created under a folder and updated in place by id.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct FolderRecord {
    id: FolderId,
    #[allow(dead_code)]
    name: String,
}

#[derive(Deserialize)]
struct DocumentRecord {
    id: DocumentId,
    name: String,
}

impl HttpRemoteStore {
    /// Create a new HTTP store pointing to the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a new HTTP store with a custom reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn folders_url(&self) -> String {
        format!("{}/folders", self.base_url)
    }

    fn folder_documents_url(&self, folder: &FolderId) -> String {
        format!("{}/folders/{}/documents", self.base_url, folder)
    }

    fn document_content_url(&self, document: &DocumentId) -> String {
        format!("{}/documents/{}/content", self.base_url, document)
    }

    fn authorized(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request.bearer_auth(token.secret())
    }
}

/// Map an error status to the store taxonomy; auth rejections must surface
/// as `Auth`, never as a generic failure.
fn status_error(status: StatusCode, context: &str) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth,
        StatusCode::NOT_FOUND => StoreError::NotFound,
        status => StoreError::Other(format!("{}: unexpected status code: {}", context, status)),
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn ensure_folder(&self, token: &AccessToken) -> Result<FolderId> {
        let response = self
            .authorized(self.client.get(self.folders_url()), token)
            .query(&[("name", APP_FOLDER_NAME)])
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), "list folders"));
        }

        let folders: Vec<FolderRecord> = response
            .json()
            .await
            .map_err(|e| StoreError::Fetch(format!("failed to parse folder list: {}", e)))?;

        if let Some(folder) = folders.into_iter().next() {
            return Ok(folder.id);
        }

        // Folder absent - create it
        let response = self
            .authorized(self.client.post(self.folders_url()), token)
            .json(&serde_json::json!({ "name": APP_FOLDER_NAME }))
            .send()
            .await
            .map_err(|e| StoreError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), "create folder"));
        }

        let folder: FolderRecord = response
            .json()
            .await
            .map_err(|e| StoreError::Upload(format!("failed to parse created folder: {}", e)))?;

        Ok(folder.id)
    }

    async fn list_documents(
        &self,
        token: &AccessToken,
        folder: &FolderId,
    ) -> Result<Vec<DocumentMeta>> {
        let response = self
            .authorized(self.client.get(self.folder_documents_url(folder)), token)
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let documents: Vec<DocumentRecord> = response.json().await.map_err(|e| {
                    StoreError::Fetch(format!("failed to parse document list: {}", e))
                })?;

                Ok(documents
                    .into_iter()
                    .filter(|d| d.name.contains(CATALOG_DOC_MARKER))
                    .map(|d| DocumentMeta {
                        id: d.id,
                        name: d.name,
                    })
                    .collect())
            }
            status => Err(status_error(status, "list documents")),
        }
    }

    async fn download(&self, token: &AccessToken, document: &DocumentId) -> Result<Vec<u8>> {
        let response = self
            .authorized(self.client.get(self.document_content_url(document)), token)
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StoreError::Fetch(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Auth),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            status => Err(StoreError::Fetch(format!(
                "download: unexpected status code: {}",
                status
            ))),
        }
    }

    async fn upload(
        &self,
        token: &AccessToken,
        folder: &FolderId,
        name: &str,
        bytes: Vec<u8>,
        existing: Option<&DocumentId>,
    ) -> Result<DocumentId> {
        match existing {
            Some(document) => {
                // Replace content in place; the identifier is preserved.
                let response = self
                    .authorized(self.client.put(self.document_content_url(document)), token)
                    .body(bytes)
                    .send()
                    .await
                    .map_err(|e| StoreError::Upload(e.to_string()))?;

                match response.status() {
                    status if status.is_success() => Ok(document.clone()),
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Auth),
                    status => Err(StoreError::Upload(format!(
                        "replace document: unexpected status code: {}",
                        status
                    ))),
                }
            }
            None => {
                let response = self
                    .authorized(self.client.post(self.folder_documents_url(folder)), token)
                    .query(&[("name", name)])
                    .body(bytes)
                    .send()
                    .await
                    .map_err(|e| StoreError::Upload(e.to_string()))?;

                match response.status() {
                    status if status.is_success() => {
                        let document: DocumentRecord = response.json().await.map_err(|e| {
                            StoreError::Upload(format!("failed to parse created document: {}", e))
                        })?;
                        Ok(document.id)
                    }
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Auth),
                    status => Err(StoreError::Upload(format!(
                        "create document: unexpected status code: {}",
                        status
                    ))),
                }
            }
        }
    }
}
