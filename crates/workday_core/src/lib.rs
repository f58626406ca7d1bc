//! Core domain logic for Workday.
//! Process registry, per-day task store and their storage backends.

pub mod app;
pub mod auth;
pub mod config;
pub mod date_cursor;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use app::{AppContext, ProcessSummary};
pub use auth::{AccessGate, LoginOutcome, SessionRecord};
pub use config::{AppConfig, Backend, ConfigError};
pub use date_cursor::{parse_iso_date, utc_today, DateCursor};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bucket::{BucketDate, DailyBucket};
pub use model::process::{builtin_processes, IconKind, WorkProcess};
pub use model::task::{ParsePriorityError, Priority, Task, TaskId};
pub use service::process_service::{NewProcess, ProcessRegistry, ProcessRemoval};
pub use service::todo_service::{CompletionStats, NewTask, TodoService};
pub use storage::{
    Collection, DocumentStore, JsonFileStore, MemoryStore, SqliteDocumentStore, StoreError,
    StoreResult, SyncStatus,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
