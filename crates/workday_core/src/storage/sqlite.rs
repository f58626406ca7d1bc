//! Per-user document backend on SQLite.
//!
//! # Responsibility
//! - Keep one row per `(collection, user_id)` in the `documents` table.
//! - Hide SQL details behind the `DocumentStore` contract.
//!
//! # Invariants
//! - Every statement is scoped to the store's fixed `user_id`.
//! - `save` is an upsert; the previous payload is replaced wholesale.

use super::{Collection, DocumentStore, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteDocumentStore {
    conn: Connection,
    user_id: String,
}

impl SqliteDocumentStore {
    /// Opens the database at `path` for documents owned by `user_id`.
    pub fn open(path: impl AsRef<Path>, user_id: impl Into<String>) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Ok(Self::with_connection(conn, user_id))
    }

    pub fn open_in_memory(user_id: impl Into<String>) -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::with_connection(conn, user_id))
    }

    /// Wraps a connection that already went through `db::open_db*`.
    pub fn with_connection(conn: Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Epoch milliseconds of the last write to `collection`, if any.
    pub fn last_updated(&self, collection: Collection) -> StoreResult<Option<i64>> {
        let value = self
            .conn
            .query_row(
                "SELECT last_updated
                 FROM documents
                 WHERE collection = ?1 AND user_id = ?2;",
                params![collection.key(), self.user_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn backend_name(&self) -> &'static str {
        "document"
    }

    fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload
                 FROM documents
                 WHERE collection = ?1 AND user_id = ?2;",
                params![collection.key(), self.user_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save(&self, collection: Collection, json: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO documents (collection, user_id, payload, last_updated)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT (collection, user_id) DO UPDATE SET
                payload = excluded.payload,
                last_updated = excluded.last_updated;",
            params![collection.key(), self.user_id, json],
        )?;
        Ok(())
    }

    fn remove(&self, collection: Collection) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND user_id = ?2;",
            params![collection.key(), self.user_id],
        )?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM documents WHERE user_id = ?1;",
            params![self.user_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteDocumentStore;
    use crate::storage::{Collection, DocumentStore};

    #[test]
    fn save_is_an_upsert_scoped_to_user() {
        let store = SqliteDocumentStore::open_in_memory("user-a").unwrap();
        store.save(Collection::DailyTodos, "[]").unwrap();
        store.save(Collection::DailyTodos, "[1]").unwrap();

        assert_eq!(
            store.load(Collection::DailyTodos).unwrap().as_deref(),
            Some("[1]")
        );
        assert!(store.last_updated(Collection::DailyTodos).unwrap().is_some());
        assert_eq!(store.last_updated(Collection::Session).unwrap(), None);
    }

    #[test]
    fn clear_only_touches_own_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.db");
        let first = SqliteDocumentStore::open(&path, "user-a").unwrap();
        let second = SqliteDocumentStore::open(&path, "user-b").unwrap();

        first.save(Collection::AllProcesses, "[]").unwrap();
        second.save(Collection::AllProcesses, "[]").unwrap();
        first.clear().unwrap();

        assert_eq!(first.load(Collection::AllProcesses).unwrap(), None);
        assert!(second.load(Collection::AllProcesses).unwrap().is_some());
    }
}
