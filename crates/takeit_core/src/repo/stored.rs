//! Persisted collection codec.
//!
//! # Responsibility
//! - Decode `items_storage` / `events_storage` JSON into domain records.
//! - Upgrade legacy shapes at the boundary and encode the current shape.
//!
//! # Invariants
//! - Legacy shapes never leave this module.
//! - Decoded records pass `validate()`; anything else fails closed.
//! - Writes always use the current `{itemId, checked}` shape.

use super::{StorageError, StorageResult};
use crate::model::event::{Event, EventItem};
use crate::model::ids::{EventId, ItemId};
use crate::model::item::Item;
use crate::model::timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Namespace for ids recovered from records persisted without one.
const RECOVERED_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a57_93e4_4b0d_a8c2_5d71_e0b9_3f46);

/// Id as found on disk. Early versions stored numeric ids, and `null` where
/// their id generator produced `NaN`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(i64),
}

impl StoredId {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    #[serde(default)]
    id: Option<StoredId>,
    text: String,
    creation_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEventItem {
    #[serde(default)]
    item_id: Option<StoredId>,
    #[serde(default)]
    checked: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEventItems {
    EventItemList(Vec<StoredEventItem>),
    LegacyIdList(Vec<Option<StoredId>>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    #[serde(default)]
    id: Option<StoredId>,
    title: String,
    creation_date: String,
    #[serde(default)]
    items: Option<StoredEventItems>,
}

pub(crate) fn decode_items(key: &'static str, raw: Option<&str>) -> StorageResult<Vec<Item>> {
    let Some(records) = parse_collection::<StoredItem>(key, raw)? else {
        return Ok(Vec::new());
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> StorageResult<Item> {
            let id = match record.id {
                Some(id) => id.into_string(),
                None => recovered_id(key, index, &record.text, &record.creation_date),
            };
            let item = Item {
                id: ItemId::from(id),
                text: record.text,
                creation_date: parse_timestamp(key, index, &record.creation_date)?,
            };
            item.validate()
                .map_err(|err| StorageError::malformed(key, format!("entry {index}: {err}")))?;
            Ok(item)
        })
        .collect()
}

pub(crate) fn decode_events(key: &'static str, raw: Option<&str>) -> StorageResult<Vec<Event>> {
    let Some(records) = parse_collection::<StoredEvent>(key, raw)? else {
        return Ok(Vec::new());
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> StorageResult<Event> {
            let id = match record.id {
                Some(id) => id.into_string(),
                None => recovered_id(key, index, &record.title, &record.creation_date),
            };
            let event = Event {
                id: EventId::from(id),
                title: record.title,
                creation_date: parse_timestamp(key, index, &record.creation_date)?,
                items: normalize_event_items(record.items),
            };
            event
                .validate()
                .map_err(|err| StorageError::malformed(key, format!("entry {index}: {err}")))?;
            Ok(event)
        })
        .collect()
}

pub(crate) fn encode<T: Serialize>(key: &'static str, records: &[T]) -> StorageResult<String> {
    serde_json::to_string(records).map_err(|source| StorageError::Encode { key, source })
}

fn parse_collection<T>(key: &'static str, raw: Option<&str>) -> StorageResult<Option<Vec<T>>>
where
    T: for<'de> Deserialize<'de>,
{
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    serde_json::from_str::<Option<Vec<T>>>(raw)
        .map_err(|source| StorageError::Decode { key, source })
}

fn parse_timestamp(
    key: &'static str,
    index: usize,
    value: &str,
) -> StorageResult<chrono::DateTime<chrono::Utc>> {
    timestamp::parse(value).ok_or_else(|| {
        StorageError::malformed(
            key,
            format!("entry {index}: invalid creationDate `{value}`"),
        )
    })
}

/// Derives a stable id for a record stored without one.
///
/// Stable across reads until the collection is rewritten, at which point the
/// derived id is persisted.
fn recovered_id(key: &str, index: usize, label: &str, creation_date: &str) -> String {
    let name = format!("{key}/{index}/{creation_date}/{label}");
    Uuid::new_v5(&RECOVERED_ID_NAMESPACE, name.as_bytes()).to_string()
}

/// Upgrades any stored items shape to unique `EventItem`s in stored order.
fn normalize_event_items(items: Option<StoredEventItems>) -> Vec<EventItem> {
    let entries: Vec<EventItem> = match items {
        None => Vec::new(),
        Some(StoredEventItems::EventItemList(entries)) => entries
            .into_iter()
            .filter_map(|entry| {
                Some(EventItem {
                    item_id: ItemId::from(entry.item_id?.into_string()),
                    checked: entry.checked.unwrap_or(false),
                })
            })
            .collect(),
        Some(StoredEventItems::LegacyIdList(ids)) => ids
            .into_iter()
            .flatten()
            .map(|id| EventItem::unchecked(ItemId::from(id.into_string())))
            .collect(),
    };

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.item_id.clone()))
        .collect()
}
