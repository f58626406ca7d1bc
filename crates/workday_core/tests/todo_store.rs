use chrono::NaiveDate;
use std::collections::HashSet;
use workday_core::{BucketDate, MemoryStore, NewTask, Priority, TodoService};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service() -> TodoService<MemoryStore> {
    TodoService::new(MemoryStore::new())
}

#[test]
fn added_task_is_returned_for_its_date_with_defaults() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    todos.add_task("accounts", day, NewTask::new("Buy milk")).unwrap();

    let tasks = todos.daily_tasks("accounts", day);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Buy milk");
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].priority, Priority::None);

    assert!(todos.daily_tasks("accounts", ymd(2024, 1, 6)).is_empty());
    assert!(todos.daily_tasks("onboarding", day).is_empty());
}

#[test]
fn toggling_twice_restores_incomplete_state() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    let id = todos.add_task("accounts", day, NewTask::new("Buy milk")).unwrap();

    assert!(todos.toggle_task("accounts", day, &id));
    assert!(todos.daily_tasks("accounts", day)[0].completed);
    assert!(todos.toggle_task("accounts", day, &id));
    assert!(!todos.daily_tasks("accounts", day)[0].completed);
}

#[test]
fn fixed_task_shows_on_every_date_and_never_as_daily() {
    let mut todos = service();
    let id = todos
        .add_task("accounts", ymd(2024, 1, 5), NewTask::new("Stand-up").fixed())
        .unwrap();

    for day in [ymd(2024, 1, 5), ymd(2024, 6, 30), ymd(2019, 12, 31)] {
        let fixed = todos.fixed_tasks("accounts");
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].id, id);
        assert!(fixed[0].fixed);
        assert!(todos.daily_tasks("accounts", day).is_empty());
    }
}

#[test]
fn tasks_for_process_lists_fixed_before_daily() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    todos.add_task("accounts", day, NewTask::new("daily")).unwrap();
    todos
        .add_task("accounts", day, NewTask::new("fixed").fixed())
        .unwrap();

    let titles: Vec<String> = todos
        .tasks_for_process("accounts", day)
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, vec!["fixed", "daily"]);
}

#[test]
fn id_operations_reach_fixed_tasks_from_any_day() {
    let mut todos = service();
    let id = todos
        .add_task("accounts", ymd(2024, 1, 5), NewTask::new("Stand-up").fixed())
        .unwrap();
    let other_day = ymd(2024, 2, 1);

    assert!(todos.toggle_task("accounts", other_day, &id));
    assert!(todos.update_task_priority("accounts", other_day, &id, Priority::High));
    let fixed = &todos.fixed_tasks("accounts")[0];
    assert!(fixed.completed);
    assert_eq!(fixed.priority, Priority::High);

    assert!(todos.delete_task("accounts", other_day, &id));
    assert!(todos.fixed_tasks("accounts").is_empty());
}

#[test]
fn missing_ids_are_noops() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    todos.add_task("accounts", day, NewTask::new("keep me")).unwrap();
    let before = todos.buckets().to_vec();

    assert!(!todos.toggle_task("accounts", day, "missing"));
    assert!(!todos.delete_task("accounts", day, "missing"));
    assert!(!todos.update_task("accounts", day, "missing", "t", "d", Priority::Low));
    assert!(!todos.update_task_priority("onboarding", day, "missing", Priority::Low));
    assert!(!todos.reorder_tasks("onboarding", day, 0, 1, false));
    assert_eq!(todos.buckets(), before.as_slice());
}

#[test]
fn update_task_replaces_editable_fields() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    let id = todos
        .add_task(
            "onboarding",
            day,
            NewTask::new("Call partner")
                .description("intro")
                .estimated_time("30m"),
        )
        .unwrap();

    assert!(todos.update_task("onboarding", day, &id, " Call partner back ", "", Priority::Medium));
    assert!(!todos.update_task("onboarding", day, &id, "   ", "ignored", Priority::High));

    let task = &todos.daily_tasks("onboarding", day)[0];
    assert_eq!(task.title, "Call partner back");
    assert_eq!(task.description, None);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.estimated_time.as_deref(), Some("30m"));
}

#[test]
fn reorder_is_a_permutation_with_gapped_order_keys() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    let ids: Vec<String> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|title| todos.add_task("accounts", day, NewTask::new(title)).unwrap())
        .collect();

    assert!(todos.reorder_tasks("accounts", day, 3, 1, false));

    let tasks = todos.daily_tasks("accounts", day);
    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "d", "b", "c"]);

    let orders: Vec<Option<i64>> = tasks.iter().map(|task| task.order).collect();
    assert_eq!(orders, vec![Some(10), Some(20), Some(30), Some(40)]);

    let before: HashSet<String> = ids.into_iter().collect();
    let after: HashSet<String> = tasks.into_iter().map(|task| task.id).collect();
    assert_eq!(before, after);
}

#[test]
fn reorder_targets_fixed_bucket_when_requested() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    for title in ["x", "y"] {
        todos
            .add_task("accounts", day, NewTask::new(title).fixed())
            .unwrap();
    }
    todos.add_task("accounts", day, NewTask::new("daily")).unwrap();

    assert!(todos.reorder_tasks("accounts", day, 1, 0, true));
    let fixed: Vec<String> = todos
        .fixed_tasks("accounts")
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(fixed, vec!["y", "x"]);
    assert_eq!(todos.daily_tasks("accounts", day)[0].order, Some(10));
}

#[test]
fn update_task_order_changes_display_sequence() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    let first = todos.add_task("accounts", day, NewTask::new("first")).unwrap();
    todos.add_task("accounts", day, NewTask::new("second")).unwrap();

    assert!(todos.update_task_order("accounts", day, &first, 99, false));
    assert_eq!(todos.daily_tasks("accounts", day)[1].id, first);
    assert!(!todos.update_task_order("accounts", day, &first, 1, true));
}

#[test]
fn copy_from_previous_day_clones_with_fresh_ids_and_is_not_idempotent() {
    let mut todos = service();
    let yesterday = ymd(2024, 3, 1);
    let today = ymd(2024, 3, 2);
    let done = todos
        .add_task(
            "onboarding",
            yesterday,
            NewTask::new("Verify partner").priority(Priority::High),
        )
        .unwrap();
    todos
        .add_task("onboarding", yesterday, NewTask::new("Send welcome email"))
        .unwrap();
    todos.toggle_task("onboarding", yesterday, &done);
    let sources = todos.daily_tasks("onboarding", yesterday);

    assert_eq!(todos.copy_from_previous_day("onboarding", today), 2);
    let copies = todos.daily_tasks("onboarding", today);
    assert_eq!(copies.len(), 2);
    for (copy, source) in copies.iter().zip(&sources) {
        assert_ne!(copy.id, source.id);
        assert!(!copy.completed);
        assert_eq!(copy.title, source.title);
        assert_eq!(copy.description, source.description);
        assert_eq!(copy.priority, source.priority);
        assert_eq!(copy.order, source.order);
        assert_eq!(copy.fixed, source.fixed);
    }

    assert_eq!(todos.copy_from_previous_day("onboarding", today), 2);
    assert_eq!(todos.daily_tasks("onboarding", today).len(), 4);
    assert!(todos.daily_tasks("onboarding", yesterday)[0].completed);
}

#[test]
fn copy_from_previous_day_is_noop_without_source_tasks() {
    let mut todos = service();
    let today = ymd(2024, 1, 1);
    todos.initialize_date(["accounts"], ymd(2023, 12, 31));

    assert_eq!(todos.copy_from_previous_day("accounts", today), 0);
    assert_eq!(todos.copy_from_previous_day("onboarding", today), 0);
    assert!(!todos
        .buckets()
        .iter()
        .any(|bucket| bucket.date == BucketDate::Day(today)));
}

#[test]
fn copy_from_previous_day_crosses_year_boundary() {
    let mut todos = service();
    todos
        .add_task("accounts", ymd(2023, 12, 31), NewTask::new("close books"))
        .unwrap();
    assert_eq!(todos.copy_from_previous_day("accounts", ymd(2024, 1, 1)), 1);
}

#[test]
fn completion_stats_cover_fixed_and_daily_tasks() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    assert_eq!(todos.completion_stats("accounts", day).total, 0);
    assert_eq!(todos.completion_stats("accounts", day).percentage, 0);

    let fixed = todos
        .add_task("accounts", day, NewTask::new("fixed").fixed())
        .unwrap();
    todos.add_task("accounts", day, NewTask::new("b")).unwrap();
    todos.add_task("accounts", day, NewTask::new("c")).unwrap();
    todos.toggle_task("accounts", day, &fixed);

    let stats = todos.completion_stats("accounts", day);
    assert_eq!((stats.completed, stats.total, stats.percentage), (1, 3, 33));
}

#[test]
fn remove_process_drops_all_of_its_buckets() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    todos.add_task("ops", day, NewTask::new("a")).unwrap();
    todos.add_task("ops", day, NewTask::new("b").fixed()).unwrap();
    todos.add_task("accounts", day, NewTask::new("c")).unwrap();

    assert_eq!(todos.remove_process("ops"), 2);
    assert!(todos.buckets().iter().all(|b| b.process_id == "accounts"));
    assert_eq!(todos.remove_process("ops"), 0);
}

#[test]
fn initialize_date_creates_missing_buckets_once() {
    let mut todos = service();
    let day = ymd(2024, 1, 5);
    assert_eq!(todos.initialize_date(["onboarding", "accounts"], day), 2);
    assert_eq!(todos.initialize_date(["onboarding", "accounts", ""], day), 0);
    assert_eq!(todos.buckets().len(), 2);
}
