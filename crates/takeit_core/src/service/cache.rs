//! In-memory mirror of one persisted collection.

use crate::model::event::Event;
use crate::model::ids::{EventId, ItemId};
use crate::model::item::Item;
use std::collections::HashSet;
use std::hash::Hash;
use tokio::sync::RwLock;

/// Record with a stable id usable for cache lookups.
pub trait Identified: Clone {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> &Self::Id;
}

impl Identified for Item {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Identified for Event {
    type Id = EventId;

    fn id(&self) -> &EventId {
        &self.id
    }
}

#[derive(Debug)]
struct MirrorState<T> {
    entries: Vec<T>,
    loaded: bool,
}

/// Cached copy of a collection, replaced wholesale on every refresh.
#[derive(Debug)]
pub(crate) struct Mirror<T: Identified> {
    state: RwLock<MirrorState<T>>,
}

impl<T: Identified> Mirror<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(MirrorState {
                entries: Vec::new(),
                loaded: false,
            }),
        }
    }

    pub(crate) async fn replace(&self, entries: Vec<T>) {
        let mut state = self.state.write().await;
        state.entries = entries;
        state.loaded = true;
    }

    pub(crate) async fn snapshot(&self) -> Vec<T> {
        self.state.read().await.entries.clone()
    }

    pub(crate) async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// Entries whose id is in `ids`, in cache order.
    pub(crate) async fn get_by_ids(&self, ids: &[T::Id]) -> Vec<T> {
        if ids.is_empty() {
            return Vec::new();
        }
        let wanted: HashSet<&T::Id> = ids.iter().collect();
        self.state
            .read()
            .await
            .entries
            .iter()
            .filter(|entry| wanted.contains(entry.id()))
            .cloned()
            .collect()
    }
}

/// Item and event mirrors shared by the providers of one storage.
#[derive(Debug)]
pub(crate) struct Mirrors {
    pub(crate) items: Mirror<Item>,
    pub(crate) events: Mirror<Event>,
}

impl Mirrors {
    pub(crate) fn new() -> Self {
        Self {
            items: Mirror::new(),
            events: Mirror::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Mirror;
    use crate::model::ids::ItemId;
    use crate::model::item::Item;

    #[tokio::test]
    async fn get_by_ids_keeps_cache_order_and_skips_unknown() {
        let mirror = Mirror::new();
        let items: Vec<Item> = ["a", "b", "c"].iter().filter_map(|t| Item::new(t)).collect();
        mirror.replace(items.clone()).await;

        let found = mirror
            .get_by_ids(&[items[2].id.clone(), ItemId::from("nope"), items[0].id.clone()])
            .await;
        assert_eq!(found, vec![items[0].clone(), items[2].clone()]);
        assert!(mirror.is_loaded().await);
    }
}
