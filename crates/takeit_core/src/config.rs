//! Core configuration and storage bootstrap.
//!
//! # Responsibility
//! - Hold fixed storage key names shared by every reader and writer.
//! - Derive on-device paths for the durable store and rolling logs.
//! - Bring up logging and the durable store from one config.
//!
//! # Invariants
//! - Key names are constants; changing them orphans existing user data.
//! - No configuration is read from files or environment variables.

use crate::kv::{KvError, KvResult, SqliteKvStore};
use crate::logging::{default_log_level, init_logging, LoggingError};
use crate::repo::ListStorage;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Store key holding the JSON array of items.
pub const ITEMS_STORAGE_KEY: &str = "items_storage";
/// Store key holding the JSON array of events.
pub const EVENTS_STORAGE_KEY: &str = "events_storage";
/// File name of the SQLite store inside the data directory.
pub const DB_FILE_NAME: &str = "takeit_storage.sqlite3";

const LOG_DIR_NAME: &str = "logs";

/// Runtime configuration supplied by the host app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// App-private data directory.
    pub data_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl CoreConfig {
    /// Builds a config with the build-mode default log level.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level().to_string(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Startup failure from [`init_core`].
#[derive(Debug)]
pub enum InitError {
    Logging(LoggingError),
    Storage(KvError),
}

impl Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging init failed: {err}"),
            Self::Storage(err) => write!(f, "storage init failed: {err}"),
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<LoggingError> for InitError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<KvError> for InitError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Starts logging under `config.log_dir()` at `config.log_level`, then opens
/// the durable store.
///
/// Calling it again with the same config is safe. A different level or data
/// directory in the same process fails with `InitError::Logging`.
pub fn init_core(config: &CoreConfig) -> Result<ListStorage<SqliteKvStore>, InitError> {
    init_logging(&config.log_level, config.log_dir())?;
    let storage = open_sqlite_storage(config)?;
    info!(
        "event=core_init module=config status=ok level={}",
        config.log_level
    );
    Ok(storage)
}

/// Opens the durable store under `config.data_dir`.
///
/// # Side effects
/// - Creates `data_dir` when missing.
/// - Creates or adopts the store schema.
pub fn open_sqlite_storage(config: &CoreConfig) -> KvResult<ListStorage<SqliteKvStore>> {
    ensure_dir(&config.data_dir)?;
    let store = SqliteKvStore::open(config.db_path())?;
    Ok(ListStorage::new(store))
}

fn ensure_dir(dir: &Path) -> KvResult<()> {
    std::fs::create_dir_all(dir).map_err(|err| {
        error!("event=data_dir_create module=config status=error error={err}");
        KvError::Unavailable(format!(
            "failed to create data directory `{}`: {err}",
            dir.display()
        ))
    })
}
