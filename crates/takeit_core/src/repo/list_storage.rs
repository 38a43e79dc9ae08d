//! Items/Events collections with association maintenance.
//!
//! # Responsibility
//! - CRUD for items and events over two fixed store keys.
//! - Attach/detach/check/uncheck of item associations inside events.
//! - Cascade item deletion into every event's association list.
//!
//! # Invariants
//! - Each collection has a single writer: read-modify-write cycles on the
//!   same collection never interleave.
//! - Locks are always taken events first, then items.
//! - `remove_items` writes Events before Items; re-running it after a partial
//!   failure converges because id filtering is idempotent.
//! - Empty id lists and blank text return before touching the store.

use super::stored::{decode_events, decode_items, encode};
use super::{StorageError, StorageResult};
use crate::config::{EVENTS_STORAGE_KEY, ITEMS_STORAGE_KEY};
use crate::kv::KeyValueStore;
use crate::model::event::Event;
use crate::model::ids::{EventId, ItemId};
use crate::model::item::Item;
use log::{debug, info};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::Mutex;

/// Storage access layer for items and events.
#[derive(Debug)]
pub struct ListStorage<S: KeyValueStore> {
    store: S,
    items_writer: Mutex<()>,
    events_writer: Mutex<()>,
}

impl<S: KeyValueStore> ListStorage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            items_writer: Mutex::new(()),
            events_writer: Mutex::new(()),
        }
    }

    /// Underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads all items in insertion order. Absent storage yields `[]`.
    pub async fn get_all_items(&self) -> StorageResult<Vec<Item>> {
        let raw = self.store.get(ITEMS_STORAGE_KEY).await?;
        decode_items(ITEMS_STORAGE_KEY, raw.as_deref())
    }

    /// Reads all events in insertion order, upgrading legacy item lists.
    pub async fn get_all_events(&self) -> StorageResult<Vec<Event>> {
        let raw = self.store.get(EVENTS_STORAGE_KEY).await?;
        decode_events(EVENTS_STORAGE_KEY, raw.as_deref())
    }

    /// Appends one item per non-blank title, in input order, in one write.
    ///
    /// Returns the created items.
    pub async fn add_items<T: AsRef<str>>(&self, titles: &[T]) -> StorageResult<Vec<Item>> {
        let created: Vec<Item> = titles
            .iter()
            .filter_map(|title| Item::new(title.as_ref()))
            .collect();
        if created.is_empty() {
            return Ok(created);
        }

        let _writer = self.items_writer.lock().await;
        let mut items = self.get_all_items().await?;
        items.extend(created.iter().cloned());
        self.write_items(&items).await?;

        info!(
            "event=items_add module=repo status=ok added={} total={}",
            created.len(),
            items.len()
        );
        Ok(created)
    }

    /// Appends one item. Returns `None` without writing when `text` is blank.
    pub async fn add_item(&self, text: &str) -> StorageResult<Option<Item>> {
        Ok(self.add_items(&[text]).await?.into_iter().next())
    }

    /// Removes items and every association referencing them.
    pub async fn remove_items(&self, item_ids: &[ItemId]) -> StorageResult<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let started_at = Instant::now();
        let targets: HashSet<ItemId> = item_ids.iter().cloned().collect();

        let _events_writer = self.events_writer.lock().await;
        let _items_writer = self.items_writer.lock().await;

        let mut events = self.get_all_events().await?;
        let links_removed: usize = events
            .iter_mut()
            .map(|event| event.detach(&targets))
            .sum();
        self.write_events(&events).await?;

        let mut items = self.get_all_items().await?;
        let before = items.len();
        items.retain(|item| !targets.contains(&item.id));
        let items_removed = before - items.len();
        self.write_items(&items).await?;

        info!(
            "event=items_remove module=repo status=ok requested={} removed={} links_removed={} duration_ms={}",
            targets.len(),
            items_removed,
            links_removed,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    pub async fn remove_item(&self, item_id: &ItemId) -> StorageResult<()> {
        self.remove_items(std::slice::from_ref(item_id)).await
    }

    /// Overwrites the items collection with `[]`. Events are untouched.
    pub async fn clear_items(&self) -> StorageResult<()> {
        let _writer = self.items_writer.lock().await;
        self.write_items(&[]).await?;
        info!("event=items_clear module=repo status=ok");
        Ok(())
    }

    /// Appends an empty event. Returns `None` without writing for a blank title.
    pub async fn add_event(&self, title: &str) -> StorageResult<Option<Event>> {
        let Some(event) = Event::new(title) else {
            return Ok(None);
        };

        let _writer = self.events_writer.lock().await;
        let mut events = self.get_all_events().await?;
        events.push(event.clone());
        self.write_events(&events).await?;

        info!(
            "event=event_add module=repo status=ok total={}",
            events.len()
        );
        Ok(Some(event))
    }

    /// Removes events. Items are never touched.
    pub async fn remove_events(&self, event_ids: &[EventId]) -> StorageResult<()> {
        if event_ids.is_empty() {
            return Ok(());
        }
        let targets: HashSet<&EventId> = event_ids.iter().collect();

        let _writer = self.events_writer.lock().await;
        let mut events = self.get_all_events().await?;
        let before = events.len();
        events.retain(|event| !targets.contains(&event.id));
        self.write_events(&events).await?;

        info!(
            "event=events_remove module=repo status=ok requested={} removed={}",
            targets.len(),
            before - events.len()
        );
        Ok(())
    }

    pub async fn remove_event(&self, event_id: &EventId) -> StorageResult<()> {
        self.remove_events(std::slice::from_ref(event_id)).await
    }

    /// Overwrites the events collection with `[]`. Items are untouched.
    pub async fn clear_events(&self) -> StorageResult<()> {
        let _writer = self.events_writer.lock().await;
        self.write_events(&[]).await?;
        info!("event=events_clear module=repo status=ok");
        Ok(())
    }

    /// Ensures every targeted event has an entry for every item id.
    ///
    /// Existing entries keep their checked flag. Unknown event ids are skipped.
    pub async fn attach_items(
        &self,
        item_ids: &[ItemId],
        event_ids: &[EventId],
    ) -> StorageResult<()> {
        if item_ids.is_empty() || event_ids.is_empty() {
            return Ok(());
        }
        let targets: HashSet<&EventId> = event_ids.iter().collect();

        let _writer = self.events_writer.lock().await;
        let mut events = self.get_all_events().await?;
        let mut matched = 0;
        let mut added = 0;
        for event in events.iter_mut().filter(|event| targets.contains(&event.id)) {
            matched += 1;
            added += event.attach(item_ids);
        }
        self.write_events(&events).await?;

        info!(
            "event=items_attach module=repo status=ok events_matched={} links_added={}",
            matched, added
        );
        Ok(())
    }

    /// Removes entries for `item_ids` from exactly one event.
    pub async fn detach_items(&self, item_ids: &[ItemId], event_id: &EventId) -> StorageResult<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let targets: HashSet<ItemId> = item_ids.iter().cloned().collect();
        let removed = self
            .update_event(event_id, |event| event.detach(&targets))
            .await?;
        info!("event=items_detach module=repo status=ok links_removed={removed}");
        Ok(())
    }

    /// Marks matching entries checked. Ids not in the event are ignored.
    pub async fn check_items(&self, item_ids: &[ItemId], event_id: &EventId) -> StorageResult<()> {
        self.set_checked(item_ids, event_id, true).await
    }

    /// Marks matching entries unchecked. Ids not in the event are ignored.
    pub async fn uncheck_items(
        &self,
        item_ids: &[ItemId],
        event_id: &EventId,
    ) -> StorageResult<()> {
        self.set_checked(item_ids, event_id, false).await
    }

    async fn set_checked(
        &self,
        item_ids: &[ItemId],
        event_id: &EventId,
        checked: bool,
    ) -> StorageResult<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let targets: HashSet<ItemId> = item_ids.iter().cloned().collect();
        let changed = self
            .update_event(event_id, |event| event.set_checked(&targets, checked))
            .await?;
        debug!("event=items_set_checked module=repo status=ok checked={checked} changed={changed}");
        Ok(())
    }

    /// Applies `mutate` to one event and persists the collection.
    async fn update_event<F>(&self, event_id: &EventId, mutate: F) -> StorageResult<usize>
    where
        F: FnOnce(&mut Event) -> usize,
    {
        let _writer = self.events_writer.lock().await;
        let mut events = self.get_all_events().await?;
        let event = events
            .iter_mut()
            .find(|event| &event.id == event_id)
            .ok_or_else(|| StorageError::EventNotFound(event_id.clone()))?;
        let affected = mutate(event);
        self.write_events(&events).await?;
        Ok(affected)
    }

    async fn write_items(&self, items: &[Item]) -> StorageResult<()> {
        let encoded = encode(ITEMS_STORAGE_KEY, items)?;
        self.store.set(ITEMS_STORAGE_KEY, encoded).await?;
        Ok(())
    }

    async fn write_events(&self, events: &[Event]) -> StorageResult<()> {
        let encoded = encode(EVENTS_STORAGE_KEY, events)?;
        self.store.set(EVENTS_STORAGE_KEY, encoded).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ListStorage;
    use crate::config::ITEMS_STORAGE_KEY;
    use crate::kv::{KeyValueStore, MemoryKvStore};

    #[tokio::test]
    async fn blank_titles_are_skipped_without_writing() {
        let storage = ListStorage::new(MemoryKvStore::new());

        let created = storage.add_items(&["", "   "]).await.unwrap();
        assert!(created.is_empty());
        assert!(storage.add_event(" ").await.unwrap().is_none());
        assert_eq!(storage.store().get(ITEMS_STORAGE_KEY).await.unwrap(), None);
        assert!(storage.store().is_empty().await);
    }

    #[tokio::test]
    async fn surrounding_whitespace_survives_a_round_trip() {
        let storage = ListStorage::new(MemoryKvStore::new());
        storage.add_items(&[" Milk  "]).await.unwrap();
        storage.add_event("  Picnic").await.unwrap();

        assert_eq!(storage.get_all_items().await.unwrap()[0].text, " Milk  ");
        assert_eq!(storage.get_all_events().await.unwrap()[0].title, "  Picnic");
    }

    #[tokio::test]
    async fn add_item_returns_created_record() {
        let storage = ListStorage::new(MemoryKvStore::new());
        let item = storage.add_item("Eggs").await.unwrap().unwrap();

        let all = storage.get_all_items().await.unwrap();
        assert_eq!(all, vec![item]);
    }
}
