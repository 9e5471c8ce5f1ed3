//! Write-through client caches.
//!
//! # Responsibility
//! - Hold the confirmed in-memory copy of each remote collection.
//! - Track per-operation loading flags and the last failure message.
//!
//! # Invariants
//! - Items only change after the backend confirms a change.
//! - Item order is the server's list order; nothing is re-sorted locally.
//! - A failed operation leaves items exactly as they were.
//!
//! # See also
//! - `service` for the per-entity command APIs built on top.

pub mod collection;
pub mod slice;

pub use collection::{CachedEntity, CollectionCache, CreatePolicy};
pub use slice::{CacheOp, CacheSlice};
