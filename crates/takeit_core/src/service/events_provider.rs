//! Events provider: cached event collection for UI consumers.
//!
//! # Invariants
//! - After a successful mutating call returns, `snapshot()` equals storage.
//! - `EventNotFound` from detach/check/uncheck propagates unchanged.

use super::cache::Mirrors;
use crate::kv::KeyValueStore;
use crate::model::event::Event;
use crate::model::ids::{EventId, ItemId};
use crate::repo::{ListStorage, StorageResult};
use log::debug;
use std::sync::Arc;

pub struct EventsProvider<S: KeyValueStore> {
    storage: Arc<ListStorage<S>>,
    mirrors: Arc<Mirrors>,
}

impl<S: KeyValueStore> EventsProvider<S> {
    pub(crate) fn new(storage: Arc<ListStorage<S>>, mirrors: Arc<Mirrors>) -> Self {
        Self { storage, mirrors }
    }

    pub async fn load_all(&self) -> StorageResult<()> {
        let events = self.storage.get_all_events().await?;
        debug!("event=events_reload module=service status=ok count={}", events.len());
        self.mirrors.events.replace(events).await;
        Ok(())
    }

    pub async fn snapshot(&self) -> Vec<Event> {
        self.mirrors.events.snapshot().await
    }

    pub async fn is_loaded(&self) -> bool {
        self.mirrors.events.is_loaded().await
    }

    pub async fn get_by_ids(&self, ids: &[EventId]) -> Vec<Event> {
        self.mirrors.events.get_by_ids(ids).await
    }

    pub async fn add_event(&self, title: &str) -> StorageResult<Option<Event>> {
        let created = self.storage.add_event(title).await?;
        self.load_all().await?;
        Ok(created)
    }

    pub async fn delete_events(&self, ids: &[EventId]) -> StorageResult<()> {
        self.storage.remove_events(ids).await?;
        self.load_all().await
    }

    pub async fn attach_items(
        &self,
        item_ids: &[ItemId],
        event_ids: &[EventId],
    ) -> StorageResult<()> {
        self.storage.attach_items(item_ids, event_ids).await?;
        self.load_all().await
    }

    pub async fn detach_items(&self, item_ids: &[ItemId], event_id: &EventId) -> StorageResult<()> {
        self.storage.detach_items(item_ids, event_id).await?;
        self.load_all().await
    }

    pub async fn check_items(&self, item_ids: &[ItemId], event_id: &EventId) -> StorageResult<()> {
        self.storage.check_items(item_ids, event_id).await?;
        self.load_all().await
    }

    pub async fn uncheck_items(
        &self,
        item_ids: &[ItemId],
        event_id: &EventId,
    ) -> StorageResult<()> {
        self.storage.uncheck_items(item_ids, event_id).await?;
        self.load_all().await
    }

    pub async fn clear_events(&self) -> StorageResult<()> {
        self.storage.clear_events().await?;
        self.load_all().await
    }
}
