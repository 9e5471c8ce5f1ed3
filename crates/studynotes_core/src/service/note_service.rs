//! Note use-case service.
//!
//! # Responsibility
//! - Provide note list/get/create/update/delete/search over the note cache.
//! - Offer the flat-text edit path used by single-field editors.
//!
//! # Invariants
//! - A confirmed create is not inserted into the cached list; callers must
//!   `list()` again to see it.
//! - An update that changes nothing structurally is not submitted.
//! - `update_plain` collapses the note body to a single unmarked paragraph.
//! - An update never changes `created_at` of a cached note; the store's update
//!   answer does not carry it.

use crate::api::Backend;
use crate::cache::{CacheSlice, CachedEntity, CollectionCache, CreatePolicy};
use crate::model::note::{Note, NoteDraft};
use crate::model::validation::ValidationError;
use crate::search::filter::filter_notes;
use log::debug;
use std::sync::Arc;

impl CachedEntity for Note {
    const KIND: &'static str = "note";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::RequireRefresh;

    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// Note service facade over a backend and the note cache.
pub struct NoteService<B: Backend> {
    backend: Arc<B>,
    cache: CollectionCache<Note>,
}

impl<B: Backend> NoteService<B> {
    /// Creates a service with an empty cache.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cache: CollectionCache::new(),
        }
    }

    /// Confirmed notes in server order.
    pub fn notes(&self) -> Vec<Note> {
        self.cache.items()
    }

    pub fn find(&self, id: &str) -> Option<Note> {
        self.cache.find(id)
    }

    /// Items, loading flags and last error.
    pub fn state(&self) -> CacheSlice<Note> {
        self.cache.snapshot()
    }

    pub fn error(&self) -> Option<String> {
        self.cache.error()
    }

    /// Reloads the whole note collection.
    pub async fn list(&self) -> bool {
        self.cache.list(self.backend.list_notes()).await
    }

    /// Fetches one note and refreshes its cached copy when present.
    pub async fn get(&self, id: &str) -> Option<Note> {
        self.cache.fetch(id, self.backend.get_note(id)).await
    }

    /// Creates a note.
    ///
    /// Returns `Ok(None)` when the backend call failed; see `error()`.
    pub async fn create(&self, draft: NoteDraft) -> Result<Option<Note>, ValidationError> {
        draft.validate()?;
        Ok(self.create_validated(draft).await)
    }

    /// Submits a draft that already passed `NoteDraft::validate`.
    pub(crate) async fn create_validated(&self, draft: NoteDraft) -> Option<Note> {
        self.cache.create(self.backend.create_note(&draft)).await
    }

    /// Replaces title and content of one note.
    ///
    /// Returns the cached note unchanged, without a backend call, when the
    /// draft equals it structurally.
    pub async fn update(
        &self,
        id: &str,
        draft: NoteDraft,
    ) -> Result<Option<Note>, ValidationError> {
        draft.validate()?;
        let current = self.cache.find(id);
        if let Some(current) = &current {
            if draft.matches(current) {
                debug!("event=note_update module=service status=skipped reason=unchanged id={id}");
                return Ok(Some(current.clone()));
            }
        }
        let request = async {
            self.backend.update_note(id, &draft).await.map(|mut note| {
                if let Some(current) = &current {
                    note.created_at = current.created_at;
                }
                note
            })
        };
        Ok(self.cache.update(id, request).await)
    }

    /// Saves an edit made through the flat-text surface.
    pub async fn update_plain(
        &self,
        id: &str,
        title: &str,
        text: &str,
    ) -> Result<Option<Note>, ValidationError> {
        self.update(id, NoteDraft::from_plain_text(title, text))
            .await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.cache.delete(id, self.backend.delete_note(id)).await
    }

    /// Filters cached notes by `term`; see `search::filter`.
    pub fn search(&self, term: Option<&str>) -> Vec<Note> {
        filter_notes(&self.cache.items(), term)
    }
}
