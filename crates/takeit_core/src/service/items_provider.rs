//! Items provider: cached item collection for UI consumers.
//!
//! # Responsibility
//! - Mirror the persisted items in memory and answer id lookups from it.
//! - Resynchronize the mirrors after every mutation it performs.
//!
//! # Invariants
//! - After a successful mutating call returns, `snapshot()` equals storage.
//! - Deleting items also reloads the shared events mirror, so the paired
//!   `EventsProvider` never serves references to deleted items.
//! - Storage errors are returned unchanged; the mirrors keep their last good
//!   state on failure.

use super::cache::Mirrors;
use crate::kv::KeyValueStore;
use crate::model::ids::ItemId;
use crate::model::item::Item;
use crate::repo::{ListStorage, StorageResult};
use log::debug;
use std::sync::Arc;

pub struct ItemsProvider<S: KeyValueStore> {
    storage: Arc<ListStorage<S>>,
    mirrors: Arc<Mirrors>,
}

impl<S: KeyValueStore> ItemsProvider<S> {
    pub(crate) fn new(storage: Arc<ListStorage<S>>, mirrors: Arc<Mirrors>) -> Self {
        Self { storage, mirrors }
    }

    /// Re-reads the whole items collection into the cache.
    pub async fn load_all(&self) -> StorageResult<()> {
        let items = self.storage.get_all_items().await?;
        debug!("event=items_reload module=service status=ok count={}", items.len());
        self.mirrors.items.replace(items).await;
        Ok(())
    }

    pub async fn snapshot(&self) -> Vec<Item> {
        self.mirrors.items.snapshot().await
    }

    pub async fn is_loaded(&self) -> bool {
        self.mirrors.items.is_loaded().await
    }

    /// Cached items with matching ids. Never reads storage.
    pub async fn get_by_ids(&self, ids: &[ItemId]) -> Vec<Item> {
        self.mirrors.items.get_by_ids(ids).await
    }

    pub async fn add_items<T: AsRef<str>>(&self, titles: &[T]) -> StorageResult<Vec<Item>> {
        let created = self.storage.add_items(titles).await?;
        self.load_all().await?;
        Ok(created)
    }

    pub async fn add_item(&self, text: &str) -> StorageResult<Option<Item>> {
        let created = self.storage.add_item(text).await?;
        self.load_all().await?;
        Ok(created)
    }

    /// Deletes items and cascades their removal out of every event.
    ///
    /// Both mirrors are reloaded because the cascade rewrites events.
    pub async fn delete_items(&self, ids: &[ItemId]) -> StorageResult<()> {
        self.storage.remove_items(ids).await?;
        self.load_all().await?;
        let events = self.storage.get_all_events().await?;
        debug!(
            "event=events_reload module=service status=ok cause=item_cascade count={}",
            events.len()
        );
        self.mirrors.events.replace(events).await;
        Ok(())
    }

    pub async fn clear_items(&self) -> StorageResult<()> {
        self.storage.clear_items().await?;
        self.load_all().await
    }
}
