//! Provider layer: cached collections kept in sync with storage.
//!
//! # Responsibility
//! - Hold in-memory mirrors of items and events for UI consumers.
//! - Route every mutation through the storage layer, then reload.
//!
//! # Invariants
//! - Providers are created in pairs over one storage and share mirrors, so a
//!   mutation through either provider is visible through both.
//! - No retry and no rollback: storage errors reach the caller as-is.

mod cache;
pub mod events_provider;
pub mod items_provider;

pub use cache::Identified;
pub use events_provider::EventsProvider;
pub use items_provider::ItemsProvider;

use crate::kv::KeyValueStore;
use crate::repo::ListStorage;
use cache::Mirrors;
use std::sync::Arc;

/// Creates the items/events provider pair for one storage.
///
/// Both start unloaded; call `load_all` on each before reading.
pub fn providers<S: KeyValueStore>(
    storage: Arc<ListStorage<S>>,
) -> (ItemsProvider<S>, EventsProvider<S>) {
    let mirrors = Arc::new(Mirrors::new());
    let items = ItemsProvider::new(Arc::clone(&storage), Arc::clone(&mirrors));
    let events = EventsProvider::new(storage, mirrors);
    (items, events)
}
