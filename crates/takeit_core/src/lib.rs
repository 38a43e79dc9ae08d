//! Local storage core for the TakeIt list app.
//! Items, events and their checked associations, persisted to an on-device
//! key-value store and mirrored in memory for the UI.

pub mod config;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{
    init_core, open_sqlite_storage, CoreConfig, InitError, EVENTS_STORAGE_KEY, ITEMS_STORAGE_KEY,
};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{Event, EventItem};
pub use model::ids::{EventId, ItemId};
pub use model::item::Item;
pub use model::sort::{sort_events_by_title, sort_items_by_text, SortOrder};
pub use model::ValidationError;
pub use repo::{ListStorage, StorageError, StorageResult};
pub use service::{providers, EventsProvider, ItemsProvider};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
