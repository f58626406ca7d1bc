//! Pluggable document storage.
//!
//! # Responsibility
//! - Define the key/document contract both backends implement.
//! - Provide typed JSON load/save helpers with fallback-on-failure reads.
//! - Track write-through outcome as a visible `SyncStatus`.
//!
//! # Invariants
//! - A backend stores exactly one JSON document per `Collection`.
//! - Read failures never escape `load_or_default`; they are logged and the
//!   caller's default is used.
//! - A failed write never rolls back caller state.

use crate::db::DbError;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Logical documents kept by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    DailyTodos,
    CustomProcesses,
    HiddenProcesses,
    AllProcesses,
    Session,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Self::DailyTodos,
        Self::CustomProcesses,
        Self::HiddenProcesses,
        Self::AllProcesses,
        Self::Session,
    ];

    /// Stable key used by every backend.
    pub fn key(self) -> &'static str {
        match self {
            Self::DailyTodos => "dailyTodos",
            Self::CustomProcesses => "customProcesses",
            Self::HiddenProcesses => "hiddenProcesses",
            Self::AllProcesses => "allProcesses",
            Self::Session => "session",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Db(DbError),
    Serialization(serde_json::Error),
    /// Backend refused the operation (used by test doubles and read-only stores).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid document json: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Storage adapter contract.
///
/// Payloads are raw JSON text so backends stay schema-agnostic.
pub trait DocumentStore {
    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;
    /// Returns the stored document, or `None` when it was never written.
    fn load(&self, collection: Collection) -> StoreResult<Option<String>>;
    /// Replaces the whole document (last write wins).
    fn save(&self, collection: Collection, json: &str) -> StoreResult<()>;
    /// Removes one document. Missing documents are not an error.
    fn remove(&self, collection: Collection) -> StoreResult<()>;

    /// Removes every document owned by this store.
    fn clear(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            self.remove(collection)?;
        }
        Ok(())
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        (**self).load(collection)
    }

    fn save(&self, collection: Collection, json: &str) -> StoreResult<()> {
        (**self).save(collection, json)
    }

    fn remove(&self, collection: Collection) -> StoreResult<()> {
        (**self).remove(collection)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Rc<S> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        (**self).load(collection)
    }

    fn save(&self, collection: Collection, json: &str) -> StoreResult<()> {
        (**self).save(collection, json)
    }

    fn remove(&self, collection: Collection) -> StoreResult<()> {
        (**self).remove(collection)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        (**self).load(collection)
    }

    fn save(&self, collection: Collection, json: &str) -> StoreResult<()> {
        (**self).save(collection, json)
    }

    fn remove(&self, collection: Collection) -> StoreResult<()> {
        (**self).remove(collection)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    /// Document was never written.
    Missing,
    /// Document existed but could not be read or parsed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    pub value: T,
    pub source: LoadSource,
}

/// Loads and parses one document.
pub fn load_json<T, S>(store: &S, collection: Collection) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    match store.load(collection)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Loads one document, falling back to `default` when absent or unreadable.
pub fn load_or_default<T, S>(
    store: &S,
    collection: Collection,
    default: impl FnOnce() -> T,
) -> Loaded<T>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    match load_json(store, collection) {
        Ok(Some(value)) => {
            debug!(
                "event=doc_load module=storage status=ok backend={} collection={collection}",
                store.backend_name()
            );
            Loaded {
                value,
                source: LoadSource::Stored,
            }
        }
        Ok(None) => {
            debug!(
                "event=doc_load module=storage status=missing backend={} collection={collection}",
                store.backend_name()
            );
            Loaded {
                value: default(),
                source: LoadSource::Missing,
            }
        }
        Err(err) => {
            warn!(
                "event=doc_load module=storage status=error backend={} collection={collection} error={err}",
                store.backend_name()
            );
            Loaded {
                value: default(),
                source: LoadSource::Fallback,
            }
        }
    }
}

/// Serializes and writes one document.
pub fn save_json<T, S>(store: &S, collection: Collection, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: DocumentStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.save(collection, &json)
}

/// Outcome of the most recent write-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Synced,
    Failed {
        collection: Collection,
        message: String,
    },
}

impl SyncStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Picks the failed status when either side failed.
    pub fn combine(self, other: SyncStatus) -> SyncStatus {
        match self {
            Self::Synced => other,
            failed => failed,
        }
    }
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synced => f.write_str("synced"),
            Self::Failed {
                collection,
                message,
            } => write!(f, "sync failed for {collection}: {message}"),
        }
    }
}

/// Writes `value` and records the outcome in `status`.
///
/// Errors are logged and absorbed; in-memory state stays authoritative.
pub(crate) fn write_through<T, S>(
    store: &S,
    collection: Collection,
    value: &T,
    status: &mut SyncStatus,
) where
    T: Serialize + ?Sized,
    S: DocumentStore + ?Sized,
{
    match save_json(store, collection, value) {
        Ok(()) => {
            debug!(
                "event=doc_save module=storage status=ok backend={} collection={collection}",
                store.backend_name()
            );
            *status = SyncStatus::Synced;
        }
        Err(err) => {
            error!(
                "event=doc_save module=storage status=error backend={} collection={collection} error={err}",
                store.backend_name()
            );
            *status = SyncStatus::Failed {
                collection,
                message: err.to_string(),
            };
        }
    }
}
