//! Storage access layer over the key-value store.
//!
//! # Responsibility
//! - Own the Items and Events collections persisted as JSON arrays.
//! - Keep item references in events consistent across deletions.
//!
//! # Invariants
//! - Every mutation is a read-modify-write of the whole collection.
//! - Decode failures surface as errors; storage is never silently reset.
//! - Semantic misses (`EventNotFound`) are reported separately from
//!   transport and decode failures.

use crate::kv::KvError;
use crate::model::ids::EventId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod list_storage;
mod stored;

pub use list_storage::ListStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Error for storage access operations.
#[derive(Debug)]
pub enum StorageError {
    Kv(KvError),
    /// Persisted value is not valid JSON for the expected collection.
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
    /// Persisted value parsed but holds an invalid record.
    Malformed { key: &'static str, reason: String },
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    EventNotFound(EventId),
}

impl StorageError {
    pub(crate) fn malformed(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            key,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound(_))
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Decode { key, source } => {
                write!(f, "failed to decode persisted `{key}`: {source}")
            }
            Self::Malformed { key, reason } => {
                write!(f, "malformed persisted `{key}`: {reason}")
            }
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
            Self::Malformed { .. } | Self::EventNotFound(_) => None,
        }
    }
}

impl From<KvError> for StorageError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}
