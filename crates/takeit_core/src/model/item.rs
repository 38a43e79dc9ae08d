//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical list entry persisted under `items_storage`.
//!
//! # Invariants
//! - `text` is never blank for a persisted item.
//! - Items are immutable after creation; only deletion changes them.

use super::ids::ItemId;
use super::timestamp;
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One list entry, e.g. a shopping-list product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    #[serde(with = "timestamp")]
    pub creation_date: DateTime<Utc>,
}

impl Item {
    /// Creates an item with a generated id and the current timestamp.
    ///
    /// Returns `None` when `text` is empty or whitespace. Otherwise `text` is kept as given.
    pub fn new(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: ItemId::generate(),
            text: text.to_string(),
            creation_date: timestamp::now(),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::BlankId);
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::BlankText);
        }
        Ok(())
    }
}
