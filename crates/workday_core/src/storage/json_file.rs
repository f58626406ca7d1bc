//! Local key-value backend: one JSON file per collection.
//!
//! # Invariants
//! - File names are `is-todo.<collection key>.json` under `dir`.
//! - Writes go to a sibling temp file first and are renamed into place, so a
//!   crash never leaves a half-written document behind.

use super::{Collection, DocumentStore, StoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "is-todo";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory when missing.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir
            .join(format!("{FILE_PREFIX}.{}.json", collection.key()))
    }
}

impl DocumentStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(collection)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, collection: Collection, json: &str) -> StoreResult<()> {
        let target = self.path_for(collection);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }

    fn remove(&self, collection: Collection) -> StoreResult<()> {
        match fs::remove_file(self.path_for(collection)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStore;
    use crate::storage::{Collection, DocumentStore};

    #[test]
    fn save_load_remove_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested")).unwrap();

        assert_eq!(store.load(Collection::DailyTodos).unwrap(), None);
        store.save(Collection::DailyTodos, "[]").unwrap();
        assert_eq!(
            store.load(Collection::DailyTodos).unwrap().as_deref(),
            Some("[]")
        );
        assert!(store
            .path_for(Collection::DailyTodos)
            .ends_with("is-todo.dailyTodos.json"));

        store.remove(Collection::DailyTodos).unwrap();
        store.remove(Collection::DailyTodos).unwrap();
        assert_eq!(store.load(Collection::DailyTodos).unwrap(), None);
    }

    #[test]
    fn clear_removes_every_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save(Collection::HiddenProcesses, "[]").unwrap();
        store.save(Collection::Session, "{}").unwrap();

        store.clear().unwrap();
        assert_eq!(store.load(Collection::HiddenProcesses).unwrap(), None);
        assert_eq!(store.load(Collection::Session).unwrap(), None);
    }
}
