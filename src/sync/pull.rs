//! Pull: reconcile remote documents into local catalogs.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};

use crate::catalog::CatalogItem;
use crate::store::DocumentMeta;

use super::envelope::{self, Envelope, EnvelopeError};
use super::error::{DocumentError, DocumentFailure, Result};
use super::SyncEngine;

/// Summary of one pull operation.
///
/// A pull succeeds as a whole even when individual documents failed; the
/// failures are listed here instead of propagating.
#[derive(Debug, Default)]
pub struct PullReport {
    /// Number of remote catalog documents listed.
    pub documents_seen: usize,
    /// Items imported per context tag.
    pub imported: HashMap<String, usize>,
    /// Envelopes skipped because their context tag is not registered.
    pub unknown_contexts: usize,
    /// Per-document fetch/decode failures.
    pub failures: Vec<DocumentFailure>,
}

impl PullReport {
    /// Total items imported across all contexts.
    pub fn total_imported(&self) -> usize {
        self.imported.values().sum()
    }
}

impl SyncEngine {
    /// Pull all remote catalog documents into their local catalogs.
    ///
    /// Documents are downloaded and decoded independently with bounded
    /// concurrency; a slow or failing document never blocks or aborts the
    /// others. Surviving envelopes are grouped by context tag in arrival
    /// order, and each catalog's import operation is invoked exactly once
    /// with its full group, so a catalog persists one batch instead of one
    /// write per document.
    pub async fn pull(&self) -> Result<PullReport> {
        let token = self.token()?;

        let folder = self.store().ensure_folder(token).await?;
        let metas = self.store().list_documents(token, &folder).await?;

        let mut report = PullReport {
            documents_seen: metas.len(),
            ..PullReport::default()
        };

        // Fetch and decode each document independently. `buffered` bounds
        // the fan-out while yielding results in listing order, which keeps
        // arrival order stable within each context group.
        let fan_out = self.options().max_concurrent_downloads.max(1);
        let decoded: Vec<(DocumentMeta, std::result::Result<Envelope, DocumentError>)> =
            stream::iter(metas.into_iter().map(|meta| {
                let store = self.store().clone();
                let token = token.clone();
                async move {
                    let result = async {
                        let bytes = store.download(&token, &meta.id).await?;
                        Ok(envelope::decode(&bytes)?)
                    }
                    .await;
                    (meta, result)
                }
            }))
            .buffered(fan_out)
            .collect()
            .await;

        // Route surviving envelopes by context tag.
        let mut groups: HashMap<String, Vec<CatalogItem>> = HashMap::new();
        for (meta, result) in decoded {
            let envelope = match result {
                Ok(envelope) => envelope,
                Err(error) => {
                    log::warn!("skipping document '{}': {}", meta.name, error);
                    report.failures.push(DocumentFailure {
                        name: meta.name,
                        error,
                    });
                    continue;
                }
            };

            if self.options().strict_marker && !envelope.marker_matches() {
                let error =
                    DocumentError::Decode(EnvelopeError::MarkerMismatch(envelope.app_marker));
                log::warn!("skipping document '{}': {}", meta.name, error);
                report.failures.push(DocumentFailure {
                    name: meta.name,
                    error,
                });
                continue;
            }

            if !self.registry().contains(&envelope.catalog_context) {
                // Unknown catalogs are not an error: documents from newer or
                // older installations simply pass through untouched.
                log::debug!(
                    "skipping document '{}' with unknown context '{}'",
                    meta.name,
                    envelope.catalog_context
                );
                report.unknown_contexts += 1;
                continue;
            }

            let context = envelope.catalog_context.clone();
            let item = envelope.into_item(meta.id);
            groups.entry(context).or_default().push(item);
        }

        // One import invocation per catalog, after its whole group is
        // collected; callers never observe a partially-applied context.
        for context in self.registry().contexts() {
            if let (Some(items), Some(catalog)) =
                (groups.remove(context), self.registry().get(context))
            {
                let count = items.len();
                catalog.import_items(items).await?;
                report.imported.insert(context.to_string(), count);
            }
        }

        Ok(report)
    }
}
