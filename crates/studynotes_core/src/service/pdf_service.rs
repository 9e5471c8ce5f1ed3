//! PDF collection service.
//!
//! # Invariants
//! - Uploads are validated locally before any bytes are sent.
//! - A confirmed upload is not inserted into the cached list.

use crate::api::Backend;
use crate::cache::{CacheSlice, CachedEntity, CollectionCache, CreatePolicy};
use crate::model::pdf::{PdfRecord, PdfUpload};
use crate::model::validation::ValidationError;
use std::sync::Arc;

impl CachedEntity for PdfRecord {
    const KIND: &'static str = "pdf";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::RequireRefresh;

    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// PDF service facade over a backend and the PDF cache.
pub struct PdfService<B: Backend> {
    backend: Arc<B>,
    cache: CollectionCache<PdfRecord>,
}

impl<B: Backend> PdfService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cache: CollectionCache::new(),
        }
    }

    pub fn pdfs(&self) -> Vec<PdfRecord> {
        self.cache.items()
    }

    pub fn find(&self, id: &str) -> Option<PdfRecord> {
        self.cache.find(id)
    }

    pub fn state(&self) -> CacheSlice<PdfRecord> {
        self.cache.snapshot()
    }

    pub fn error(&self) -> Option<String> {
        self.cache.error()
    }

    pub async fn list(&self) -> bool {
        self.cache.list(self.backend.list_pdfs()).await
    }

    /// Fetches one record and refreshes its cached copy when present.
    pub async fn get(&self, id: &str) -> Option<PdfRecord> {
        self.cache.fetch(id, self.backend.get_pdf(id)).await
    }

    /// Uploads one PDF file.
    ///
    /// Returns `Ok(None)` when the backend call failed; see `error()`.
    pub async fn upload(&self, upload: PdfUpload) -> Result<Option<PdfRecord>, ValidationError> {
        upload.validate()?;
        Ok(self.cache.create(self.backend.upload_pdf(&upload)).await)
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.cache.delete(id, self.backend.delete_pdf(id)).await
    }

    /// Applies a confirmed pipeline result to the cached record, if cached.
    pub(crate) fn patch<F>(&self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut PdfRecord),
    {
        self.cache.patch(id, edit)
    }
}
