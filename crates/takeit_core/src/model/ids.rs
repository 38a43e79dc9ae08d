//! Identifier newtypes for items and events.
//!
//! # Invariants
//! - `ItemId` and `EventId` are separate id spaces; mixing them is a type error.
//! - Generated ids are UUID v4 strings and never reused.
//! - Persisted ids are opaque strings; no format is assumed when reading.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a stored item.
    ItemId
);

string_id!(
    /// Stable identifier of a stored event.
    EventId
);

#[cfg(test)]
mod tests {
    use super::{EventId, ItemId};

    #[test]
    fn generated_ids_are_unique_uuid_strings() {
        let first = ItemId::generate();
        let second = ItemId::generate();
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 36);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = EventId::from("evt-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"evt-1\"");
    }
}
