//! Domain model for items, events and their associations.
//!
//! # Responsibility
//! - Define the canonical shapes persisted by the storage layer.
//! - Keep association logic (attach/detach/check) next to the data it mutates.
//!
//! # Invariants
//! - Item and event ids live in separate typed id spaces.
//! - An event holds at most one association per item.

pub mod event;
pub mod ids;
pub mod item;
pub mod sort;
pub mod timestamp;

use ids::ItemId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankId,
    BlankText,
    BlankTitle,
    DuplicateEventItem(ItemId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "id must not be blank"),
            Self::BlankText => write!(f, "item text must not be blank"),
            Self::BlankTitle => write!(f, "event title must not be blank"),
            Self::DuplicateEventItem(id) => write!(f, "duplicate event item: {id}"),
        }
    }
}

impl Error for ValidationError {}
