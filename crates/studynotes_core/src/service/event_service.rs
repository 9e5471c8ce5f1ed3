//! Event scheduling service.
//!
//! # Invariants
//! - Title and time window are validated before submission; equal start and
//!   end are accepted.
//! - Unlike notes and PDFs, a confirmed event is appended to the cached list
//!   right away.

use crate::api::Backend;
use crate::cache::{CacheSlice, CachedEntity, CollectionCache, CreatePolicy};
use crate::model::event::{Event, EventDraft};
use crate::model::validation::ValidationError;
use std::sync::Arc;

impl CachedEntity for Event {
    const KIND: &'static str = "event";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::AppendConfirmed;

    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// Event service facade over a backend and the event cache.
pub struct EventService<B: Backend> {
    backend: Arc<B>,
    cache: CollectionCache<Event>,
}

impl<B: Backend> EventService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cache: CollectionCache::new(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.cache.items()
    }

    pub fn state(&self) -> CacheSlice<Event> {
        self.cache.snapshot()
    }

    pub fn error(&self) -> Option<String> {
        self.cache.error()
    }

    pub async fn list(&self) -> bool {
        self.cache.list(self.backend.list_events()).await
    }

    /// Validates and submits a new event.
    ///
    /// Returns `Ok(None)` when the backend call failed; see `error()`.
    pub async fn schedule(&self, draft: EventDraft) -> Result<Option<Event>, ValidationError> {
        draft.validate()?;
        Ok(self.cache.create(self.backend.create_event(&draft)).await)
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.cache.delete(id, self.backend.delete_event(id)).await
    }
}
