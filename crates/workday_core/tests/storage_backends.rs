use chrono::NaiveDate;
use workday_core::{
    AppContext, Collection, DateCursor, DocumentStore, JsonFileStore, MemoryStore, NewTask,
    Priority, SqliteDocumentStore, SyncStatus, TodoService, utc_today,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_and_complete<S: DocumentStore>(store: S, day: NaiveDate) -> String {
    let mut todos = TodoService::new(store);
    let id = todos
        .add_task(
            "accounts",
            day,
            NewTask::new("Reconcile ledger").priority(Priority::High),
        )
        .unwrap();
    todos
        .add_task("accounts", day, NewTask::new("Stand-up").fixed())
        .unwrap();
    assert!(todos.toggle_task("accounts", day, &id));
    assert_eq!(todos.sync_status(), &SyncStatus::Synced);
    id
}

fn assert_reloaded<S: DocumentStore>(store: S, day: NaiveDate, id: &str) {
    let todos = TodoService::load(store, day);
    let daily = todos.daily_tasks("accounts", day);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].id, id);
    assert!(daily[0].completed);
    assert_eq!(daily[0].priority, Priority::High);
    assert_eq!(todos.fixed_tasks("accounts").len(), 1);
}

#[test]
fn json_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let day = ymd(2024, 1, 5);

    let id = add_and_complete(JsonFileStore::open(dir.path()).unwrap(), day);
    assert!(dir.path().join("is-todo.dailyTodos.json").exists());

    assert_reloaded(JsonFileStore::open(dir.path()).unwrap(), day, &id);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("documents.db");
    let day = ymd(2024, 1, 5);

    let id = add_and_complete(SqliteDocumentStore::open(&path, "alice").unwrap(), day);

    let reopened = SqliteDocumentStore::open(&path, "alice").unwrap();
    assert!(reopened.last_updated(Collection::DailyTodos).unwrap().is_some());
    assert_reloaded(reopened, day, &id);
}

#[test]
fn sqlite_store_isolates_users() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("documents.db");
    let day = ymd(2024, 1, 5);
    add_and_complete(SqliteDocumentStore::open(&path, "alice").unwrap(), day);

    let bob = SqliteDocumentStore::open(&path, "bob").unwrap();
    assert_eq!(bob.load(Collection::DailyTodos).unwrap(), None);

    // Unknown user falls back to the sample data, not alice's tasks.
    let todos = TodoService::load(bob, day);
    assert!(todos
        .daily_tasks("accounts", day)
        .iter()
        .all(|task| task.title != "Reconcile ledger"));
}

#[test]
fn empty_store_loads_sample_data_and_builtin_processes() {
    let app = AppContext::load(MemoryStore::new(), DateCursor::today());
    let today = utc_today();
    let yesterday = today.pred_opt().unwrap();

    assert_eq!(app.daily_tasks("onboarding").len(), 2);
    assert_eq!(app.daily_tasks("accounts").len(), 1);
    assert_eq!(app.todos().daily_tasks("onboarding", yesterday).len(), 2);

    let ids: Vec<&str> = app
        .processes()
        .list()
        .into_iter()
        .map(|process| process.id.as_str())
        .collect();
    assert_eq!(ids, vec!["daily-todos", "onboarding", "accounts"]);
    assert!(app.todos().store().load(Collection::AllProcesses).unwrap().is_some());
}

#[test]
fn sample_data_follows_today_not_the_selected_date() {
    let selected = ymd(2024, 1, 5);
    let app = AppContext::load(MemoryStore::new(), DateCursor::new(selected));

    assert!(app.daily_tasks("onboarding").is_empty());
    assert!(app.todos().daily_tasks("onboarding", ymd(2024, 1, 4)).is_empty());
    assert_eq!(app.todos().daily_tasks("onboarding", utc_today()).len(), 2);
}

#[test]
fn corrupt_document_falls_back_without_failing() {
    let store = MemoryStore::new();
    store.save(Collection::DailyTodos, "{\"broken\":").unwrap();
    let day = ymd(2024, 1, 5);

    let todos = TodoService::load(&store, day);
    assert_eq!(todos.daily_tasks("onboarding", day).len(), 2);
}

#[test]
fn failed_write_keeps_memory_state_and_surfaces_status() {
    let store = MemoryStore::new();
    let day = ymd(2024, 1, 5);
    let mut todos = TodoService::new(&store);

    store.set_fail_writes(true);
    let id = todos.add_task("accounts", day, NewTask::new("offline")).unwrap();
    assert!(todos.sync_status().is_failed());
    assert_eq!(todos.daily_tasks("accounts", day)[0].id, id);
    assert_eq!(store.load(Collection::DailyTodos).unwrap(), None);

    store.set_fail_writes(false);
    assert!(todos.toggle_task("accounts", day, &id));
    assert_eq!(todos.sync_status(), &SyncStatus::Synced);
    let raw = store.load(Collection::DailyTodos).unwrap().unwrap();
    assert!(raw.contains(&id));
}

#[test]
fn persisted_documents_use_camel_case_keys() {
    let store = MemoryStore::new();
    let day = ymd(2024, 1, 5);
    let mut todos = TodoService::new(&store);
    todos
        .add_task(
            "accounts",
            day,
            NewTask::new("Estimate").estimated_time("1h"),
        )
        .unwrap();

    let raw = store.load(Collection::DailyTodos).unwrap().unwrap();
    assert!(raw.contains("\"processId\":\"accounts\""));
    assert!(raw.contains("\"date\":\"2024-01-05\""));
    assert!(raw.contains("\"estimatedTime\":\"1h\""));
}

#[test]
fn legacy_documents_with_string_ids_load() {
    let store = MemoryStore::new();
    store
        .save(
            Collection::DailyTodos,
            r#"[{"processId":"onboarding","date":"fixed","todos":[
                {"id":"1","title":"Weekly sync","completed":false,"priority":"medium","fixed":true}
            ]}]"#,
        )
        .unwrap();

    let mut todos = TodoService::load(&store, ymd(2024, 1, 5));
    assert_eq!(todos.fixed_tasks("onboarding")[0].id, "1");
    assert!(todos.toggle_task("onboarding", ymd(2030, 1, 1), "1"));
}
