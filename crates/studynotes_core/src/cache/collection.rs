//! Generic write-through collection cache.
//!
//! # Responsibility
//! - Apply confirmed backend results to one `CacheSlice`.
//! - Keep the create policy of each entity kind explicit.
//! - Drop `list()` responses older than state already applied.
//!
//! # Invariants
//! - No optimistic writes: every change waits for the backend.
//! - No `RefCell` borrow is held across an await point; the cache is meant for
//!   a single-threaded executor and is not `Sync`.
//! - Each `list()` takes a ticket from a monotonic counter. A response is
//!   applied only if its ticket is not older than the last applied list, and
//!   was not issued before a mutation that has since been confirmed.

use crate::api::OpResult;
use crate::cache::slice::{CacheOp, CacheSlice};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::future::Future;

/// What a confirmed create does to the local items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Leave items alone; the view must `list()` again to see the new entity.
    RequireRefresh,
    /// Append the confirmed entity to the end of items.
    AppendConfirmed,
}

/// Entity stored in a `CollectionCache`.
pub trait CachedEntity: Clone {
    /// Kind name used in log lines.
    const KIND: &'static str;
    const CREATE_POLICY: CreatePolicy;

    fn entity_id(&self) -> &str;
}

/// Cache for one entity kind.
pub struct CollectionCache<T: CachedEntity> {
    slice: RefCell<CacheSlice<T>>,
    next_ticket: Cell<u64>,
    applied_floor: Cell<u64>,
}

impl<T: CachedEntity> Default for CollectionCache<T> {
    fn default() -> Self {
        Self {
            slice: RefCell::new(CacheSlice::new()),
            next_ticket: Cell::new(0),
            applied_floor: Cell::new(0),
        }
    }
}

impl<T: CachedEntity> CollectionCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current slice state.
    pub fn snapshot(&self) -> CacheSlice<T> {
        self.slice.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.slice.borrow().items().to_vec()
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.slice
            .borrow()
            .items()
            .iter()
            .find(|item| item.entity_id() == id)
            .cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.slice.borrow().error().map(str::to_string)
    }

    pub fn loading(&self) -> bool {
        self.slice.borrow().loading()
    }

    pub fn is_loading(&self, op: CacheOp) -> bool {
        self.slice.borrow().is_loading(op)
    }

    pub fn clear_error(&self) {
        self.slice.borrow_mut().clear_error();
    }

    /// Replaces items wholesale with the server list.
    ///
    /// Returns `true` when the response was applied.
    pub async fn list<F>(&self, request: F) -> bool
    where
        F: Future<Output = OpResult<Vec<T>>>,
    {
        let ticket = self.issue_ticket();
        self.slice.borrow_mut().start(CacheOp::List);
        let outcome = request.await;

        let mut slice = self.slice.borrow_mut();
        if ticket < self.applied_floor.get() {
            slice.discard(CacheOp::List);
            debug!(
                "event=cache_list module=cache status=stale kind={} ticket={ticket}",
                T::KIND
            );
            return false;
        }

        match outcome {
            Ok(items) => {
                self.applied_floor.set(ticket);
                let count = items.len();
                slice.succeed(CacheOp::List, move |current| *current = items);
                info!(
                    "event=cache_list module=cache status=ok kind={} count={count}",
                    T::KIND
                );
                true
            }
            Err(err) => {
                slice.fail(CacheOp::List, err.message());
                warn!(
                    "event=cache_list module=cache status=error kind={}",
                    T::KIND
                );
                false
            }
        }
    }

    /// Submits a create and applies `T::CREATE_POLICY` on success.
    pub async fn create<F>(&self, request: F) -> Option<T>
    where
        F: Future<Output = OpResult<T>>,
    {
        let started = self.next_ticket.get();
        self.slice.borrow_mut().start(CacheOp::Create);
        let outcome = request.await;

        let mut slice = self.slice.borrow_mut();
        match outcome {
            Ok(created) => {
                let appended = created.clone();
                slice.succeed(CacheOp::Create, |items| {
                    if T::CREATE_POLICY == CreatePolicy::AppendConfirmed {
                        items.push(appended);
                    }
                });
                if T::CREATE_POLICY == CreatePolicy::AppendConfirmed {
                    self.mark_mutation(started);
                }
                info!(
                    "event=cache_create module=cache status=ok kind={} id={}",
                    T::KIND,
                    created.entity_id()
                );
                Some(created)
            }
            Err(err) => {
                slice.fail(CacheOp::Create, err.message());
                warn!(
                    "event=cache_create module=cache status=error kind={}",
                    T::KIND
                );
                None
            }
        }
    }

    /// Submits an update; on success the element with matching `id` is
    /// replaced by the server entity.
    pub async fn update<F>(&self, id: &str, request: F) -> Option<T>
    where
        F: Future<Output = OpResult<T>>,
    {
        self.replace_with(CacheOp::Update, id, request).await
    }

    /// Fetches one entity; on success a cached copy with matching `id` is
    /// replaced. Absent entities are not inserted.
    pub async fn fetch<F>(&self, id: &str, request: F) -> Option<T>
    where
        F: Future<Output = OpResult<T>>,
    {
        self.replace_with(CacheOp::Fetch, id, request).await
    }

    /// Submits a delete; on success the element with matching `id` is removed.
    pub async fn delete<F>(&self, id: &str, request: F) -> bool
    where
        F: Future<Output = OpResult<()>>,
    {
        let started = self.next_ticket.get();
        self.slice.borrow_mut().start(CacheOp::Delete);
        let outcome = request.await;

        let mut slice = self.slice.borrow_mut();
        match outcome {
            Ok(()) => {
                slice.succeed(CacheOp::Delete, |items| {
                    items.retain(|item| item.entity_id() != id)
                });
                self.mark_mutation(started);
                info!(
                    "event=cache_delete module=cache status=ok kind={} id={id}",
                    T::KIND
                );
                true
            }
            Err(err) => {
                slice.fail(CacheOp::Delete, err.message());
                warn!(
                    "event=cache_delete module=cache status=error kind={} id={id}",
                    T::KIND
                );
                false
            }
        }
    }

    /// Edits a cached element in place after a confirmed side-channel change
    /// (for example a pipeline stage). Returns `false` when absent.
    pub fn patch<F>(&self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut patched = false;
        self.slice.borrow_mut().edit(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.entity_id() == id) {
                edit(item);
                patched = true;
            }
        });
        if patched {
            self.mark_mutation(self.next_ticket.get());
        }
        patched
    }

    async fn replace_with<F>(&self, op: CacheOp, id: &str, request: F) -> Option<T>
    where
        F: Future<Output = OpResult<T>>,
    {
        let started = self.next_ticket.get();
        self.slice.borrow_mut().start(op);
        let outcome = request.await;

        let mut slice = self.slice.borrow_mut();
        match outcome {
            Ok(entity) => {
                let replacement = entity.clone();
                let mut replaced = false;
                slice.succeed(op, |items| {
                    if let Some(slot) = items.iter_mut().find(|item| item.entity_id() == id) {
                        *slot = replacement;
                        replaced = true;
                    }
                });
                if replaced {
                    self.mark_mutation(started);
                }
                info!(
                    "event=cache_{} module=cache status=ok kind={} id={id} replaced={replaced}",
                    op.as_str(),
                    T::KIND
                );
                Some(entity)
            }
            Err(err) => {
                slice.fail(op, err.message());
                warn!(
                    "event=cache_{} module=cache status=error kind={} id={id}",
                    op.as_str(),
                    T::KIND
                );
                None
            }
        }
    }

    fn issue_ticket(&self) -> u64 {
        let ticket = self.next_ticket.get();
        self.next_ticket.set(ticket + 1);
        ticket
    }

    /// Lists issued before the mutation was sent can no longer be applied.
    /// `started` is the next unissued ticket at send time.
    fn mark_mutation(&self, started: u64) {
        if started > self.applied_floor.get() {
            self.applied_floor.set(started);
        }
    }
}
