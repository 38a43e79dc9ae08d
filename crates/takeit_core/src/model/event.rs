//! Event domain model and its embedded item associations.
//!
//! # Responsibility
//! - Define the named collection persisted under `events_storage`.
//! - Own per-association checked state through `EventItem`.
//!
//! # Invariants
//! - `title` is never blank for a persisted event.
//! - At most one `EventItem` per `item_id` within one event.
//! - `items` keeps insertion order.

use super::ids::{EventId, ItemId};
use super::timestamp;
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Association between one item and one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub item_id: ItemId,
    pub checked: bool,
}

impl EventItem {
    /// Creates an unchecked association.
    pub fn unchecked(item_id: ItemId) -> Self {
        Self {
            item_id,
            checked: false,
        }
    }
}

/// A named context (e.g. a shopping trip) referencing a subset of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(with = "timestamp")]
    pub creation_date: DateTime<Utc>,
    pub items: Vec<EventItem>,
}

impl Event {
    /// Creates an empty event with a generated id and the current timestamp.
    ///
    /// Returns `None` when `title` is empty or whitespace. Otherwise `title` is kept as given.
    pub fn new(title: &str) -> Option<Self> {
        if title.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: EventId::generate(),
            title: title.to_string(),
            creation_date: timestamp::now(),
            items: Vec::new(),
        })
    }

    pub fn contains_item(&self, item_id: &ItemId) -> bool {
        self.items.iter().any(|entry| &entry.item_id == item_id)
    }

    /// Item ids in association order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .map(|entry| entry.item_id.clone())
            .collect()
    }

    pub fn checked_item_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|entry| entry.checked)
            .map(|entry| entry.item_id.clone())
            .collect()
    }

    /// Adds unchecked entries for ids not yet present.
    ///
    /// Existing entries keep their checked flag. Returns the number of
    /// entries added.
    pub fn attach(&mut self, item_ids: &[ItemId]) -> usize {
        let mut present: HashSet<ItemId> = self.item_ids().into_iter().collect();
        let mut added = 0;
        for item_id in item_ids {
            if present.insert(item_id.clone()) {
                self.items.push(EventItem::unchecked(item_id.clone()));
                added += 1;
            }
        }
        added
    }

    /// Removes entries whose id is in `item_ids`. Returns the number removed.
    pub fn detach(&mut self, item_ids: &HashSet<ItemId>) -> usize {
        let before = self.items.len();
        self.items.retain(|entry| !item_ids.contains(&entry.item_id));
        before - self.items.len()
    }

    /// Sets `checked` on matching entries; unknown ids are ignored.
    ///
    /// Returns the number of entries whose flag changed.
    pub fn set_checked(&mut self, item_ids: &HashSet<ItemId>, checked: bool) -> usize {
        let mut changed = 0;
        for entry in &mut self.items {
            if item_ids.contains(&entry.item_id) && entry.checked != checked {
                entry.checked = checked;
                changed += 1;
            }
        }
        changed
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::BlankId);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        let mut seen = HashSet::new();
        for entry in &self.items {
            if entry.item_id.as_str().trim().is_empty() {
                return Err(ValidationError::BlankId);
            }
            if !seen.insert(&entry.item_id) {
                return Err(ValidationError::DuplicateEventItem(entry.item_id.clone()));
            }
        }
        Ok(())
    }
}
