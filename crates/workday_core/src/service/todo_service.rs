//! Task store: CRUD and ordering over `(process, date)` buckets.
//!
//! # Responsibility
//! - Index tasks by process and date, keeping fixed tasks in their own bucket.
//! - Maintain manual ordering through order keys.
//! - Copy a day's tasks forward with fresh identities.
//! - Write every mutation through to the configured `DocumentStore`.
//!
//! # Invariants
//! - At most one bucket exists per `(process_id, BucketDate)`.
//! - Empty process ids, task ids and titles are silent no-ops.
//! - Id-addressed operations look in the day bucket first, then the fixed one.
//! - A failed write never rolls back memory; it only flips `sync_status()`.

use crate::date_cursor::previous_day;
use crate::model::bucket::{BucketDate, DailyBucket};
use crate::model::seed::sample_buckets;
use crate::model::task::{non_empty_trimmed, Priority, Task, TaskId};
use crate::storage::{
    load_or_default, write_through, Collection, DocumentStore, LoadSource, SyncStatus,
};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Input for `TodoService::add_task`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_time: Option<String>,
    pub is_fixed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn estimated_time(mut self, estimated_time: impl Into<String>) -> Self {
        self.estimated_time = Some(estimated_time.into());
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }
}

/// Completion summary for one process on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// `round(completed / total * 100)`, `0` for an empty set.
    pub percentage: u32,
}

impl CompletionStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (completed, total) = tasks.into_iter().fold((0, 0), |(done, all), task| {
            (done + usize::from(task.completed), all + 1)
        });
        let percentage = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Write-through task store.
pub struct TodoService<S: DocumentStore> {
    store: S,
    buckets: Vec<DailyBucket>,
    status: SyncStatus,
}

impl<S: DocumentStore> TodoService<S> {
    /// Creates an empty store without reading from `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            buckets: Vec::new(),
            status: SyncStatus::Synced,
        }
    }

    /// Loads buckets from `store`.
    ///
    /// A missing or unreadable document falls back to the sample dataset
    /// built around `today`. Duplicate bucket keys are merged.
    pub fn load(store: S, today: NaiveDate) -> Self {
        let loaded = load_or_default(&store, Collection::DailyTodos, || sample_buckets(today));
        let buckets = merge_duplicate_buckets(loaded.value);
        info!(
            "event=todo_load module=todo status=ok backend={} source={} buckets={}",
            store.backend_name(),
            load_source_label(loaded.source),
            buckets.len()
        );
        Self {
            store,
            buckets,
            status: SyncStatus::Synced,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn buckets(&self) -> &[DailyBucket] {
        &self.buckets
    }

    pub fn sync_status(&self) -> &SyncStatus {
        &self.status
    }

    /// Adds a task at the end of the targeted bucket.
    ///
    /// Returns the new id, or `None` when `process_id` or the title is blank.
    pub fn add_task(
        &mut self,
        process_id: &str,
        day: NaiveDate,
        new_task: NewTask,
    ) -> Option<TaskId> {
        if process_id.trim().is_empty() {
            debug!("event=task_add module=todo status=skipped reason=empty_process_id");
            return None;
        }
        let Some(title) = non_empty_trimmed(&new_task.title) else {
            debug!("event=task_add module=todo status=skipped reason=empty_title");
            return None;
        };

        let date = target_date(day, new_task.is_fixed);
        let bucket = self.bucket_or_insert(process_id, date);

        let mut task = Task::new(title, new_task.priority);
        task.description = non_empty_trimmed(&new_task.description);
        task.estimated_time = new_task
            .estimated_time
            .as_deref()
            .and_then(non_empty_trimmed);
        task.fixed = new_task.is_fixed;
        task.order = Some(bucket.next_order());
        let id = task.id.clone();
        bucket.todos.push(task);

        info!("event=task_add module=todo status=ok process_id={process_id} date={date}");
        self.persist();
        Some(id)
    }

    /// Flips the completion flag of one task.
    pub fn toggle_task(&mut self, process_id: &str, day: NaiveDate, task_id: &str) -> bool {
        self.mutate_task("task_toggle", process_id, day, task_id, |task| {
            task.completed = !task.completed;
        })
    }

    /// Replaces title, description and priority of one task.
    ///
    /// A blank title is a no-op.
    pub fn update_task(
        &mut self,
        process_id: &str,
        day: NaiveDate,
        task_id: &str,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> bool {
        let Some(title) = non_empty_trimmed(title) else {
            debug!("event=task_update module=todo status=skipped reason=empty_title");
            return false;
        };
        let description = non_empty_trimmed(description);
        self.mutate_task("task_update", process_id, day, task_id, move |task| {
            task.title = title;
            task.description = description;
            task.priority = priority;
        })
    }

    pub fn update_task_priority(
        &mut self,
        process_id: &str,
        day: NaiveDate,
        task_id: &str,
        priority: Priority,
    ) -> bool {
        self.mutate_task("task_priority", process_id, day, task_id, |task| {
            task.priority = priority;
        })
    }

    /// Sets one task's order key in the day or fixed bucket.
    pub fn update_task_order(
        &mut self,
        process_id: &str,
        day: NaiveDate,
        task_id: &str,
        new_order: i64,
        is_fixed: bool,
    ) -> bool {
        if process_id.trim().is_empty() || task_id.trim().is_empty() {
            return false;
        }
        let date = target_date(day, is_fixed);
        let Some(index) = self.bucket_position(process_id, date) else {
            return false;
        };
        match self.buckets[index].find_mut(task_id) {
            Some(task) => task.order = Some(new_order),
            None => return false,
        }

        info!("event=task_order module=todo status=ok process_id={process_id} date={date}");
        self.persist();
        true
    }

    /// Removes one task.
    pub fn delete_task(&mut self, process_id: &str, day: NaiveDate, task_id: &str) -> bool {
        if process_id.trim().is_empty() || task_id.trim().is_empty() {
            return false;
        }
        let Some(index) = self.locate_bucket(process_id, day, task_id) else {
            debug!("event=task_delete module=todo status=skipped reason=not_found");
            return false;
        };
        let bucket = &mut self.buckets[index];
        bucket.todos.retain(|task| task.id != task_id);
        let date = bucket.date;

        info!("event=task_delete module=todo status=ok process_id={process_id} date={date}");
        self.persist();
        true
    }

    /// Moves the task at display position `source_index` to
    /// `destination_index`, then renumbers the bucket `10, 20, 30, ...`.
    ///
    /// `destination_index` past the end moves the task last.
    pub fn reorder_tasks(
        &mut self,
        process_id: &str,
        day: NaiveDate,
        source_index: usize,
        destination_index: usize,
        is_fixed: bool,
    ) -> bool {
        if process_id.trim().is_empty() {
            return false;
        }
        let date = target_date(day, is_fixed);
        let Some(index) = self.bucket_position(process_id, date) else {
            return false;
        };
        let bucket = &mut self.buckets[index];
        if source_index >= bucket.todos.len() {
            debug!("event=task_reorder module=todo status=skipped reason=source_out_of_range");
            return false;
        }

        let mut ordered = bucket.sorted();
        let moved = ordered.remove(source_index);
        let destination = destination_index.min(ordered.len());
        ordered.insert(destination, moved);
        for (position, task) in ordered.iter_mut().enumerate() {
            task.order = Some((position as i64 + 1) * 10);
        }
        bucket.todos = ordered;

        info!(
            "event=task_reorder module=todo status=ok process_id={process_id} date={date} from={source_index} to={destination}"
        );
        self.persist();
        true
    }

    /// Day-bucket tasks in display order.
    pub fn daily_tasks(&self, process_id: &str, day: NaiveDate) -> Vec<Task> {
        self.sorted_bucket(process_id, BucketDate::Day(day))
    }

    /// Fixed-bucket tasks in display order.
    pub fn fixed_tasks(&self, process_id: &str) -> Vec<Task> {
        self.sorted_bucket(process_id, BucketDate::Fixed)
    }

    /// Fixed tasks followed by the day's tasks.
    pub fn tasks_for_process(&self, process_id: &str, day: NaiveDate) -> Vec<Task> {
        let mut tasks = self.fixed_tasks(process_id);
        tasks.extend(self.daily_tasks(process_id, day));
        tasks
    }

    /// Adds fresh copies of the previous day's tasks to `day`.
    ///
    /// Copies keep their source order keys, so they sort in among tasks
    /// already on `day` rather than after them. Returns the number of copied
    /// tasks; `0` means nothing was there.
    pub fn copy_from_previous_day(&mut self, process_id: &str, day: NaiveDate) -> usize {
        if process_id.trim().is_empty() {
            return 0;
        }
        let Some(previous) = previous_day(day) else {
            return 0;
        };
        let copies: Vec<Task> = self
            .bucket_position(process_id, BucketDate::Day(previous))
            .map(|index| self.buckets[index].todos.iter().map(Task::clone_forward).collect())
            .unwrap_or_default();
        if copies.is_empty() {
            debug!(
                "event=task_copy_forward module=todo status=skipped reason=empty_source process_id={process_id}"
            );
            return 0;
        }

        let copied = copies.len();
        self.bucket_or_insert(process_id, BucketDate::Day(day))
            .todos
            .extend(copies);

        info!(
            "event=task_copy_forward module=todo status=ok process_id={process_id} date={day} copied={copied}"
        );
        self.persist();
        copied
    }

    pub fn completion_stats(&self, process_id: &str, day: NaiveDate) -> CompletionStats {
        CompletionStats::from_tasks(&self.tasks_for_process(process_id, day))
    }

    /// Ensures an empty bucket exists for each process on `day`.
    pub fn initialize_date<I, P>(&mut self, process_ids: I, day: NaiveDate) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let date = BucketDate::Day(day);
        let mut created = 0;
        for process_id in process_ids {
            let process_id = process_id.as_ref();
            if process_id.trim().is_empty() || self.bucket_position(process_id, date).is_some() {
                continue;
            }
            self.buckets.push(DailyBucket::new(process_id, date));
            created += 1;
        }
        if created > 0 {
            debug!("event=date_init module=todo status=ok date={date} created={created}");
            self.persist();
        }
        created
    }

    /// Drops every bucket of `process_id`. Returns how many were removed.
    pub fn remove_process(&mut self, process_id: &str) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|bucket| bucket.process_id != process_id);
        let removed = before - self.buckets.len();
        if removed > 0 {
            info!("event=process_purge module=todo status=ok process_id={process_id} buckets={removed}");
            self.persist();
        }
        removed
    }

    fn mutate_task(
        &mut self,
        event: &'static str,
        process_id: &str,
        day: NaiveDate,
        task_id: &str,
        apply: impl FnOnce(&mut Task),
    ) -> bool {
        if process_id.trim().is_empty() || task_id.trim().is_empty() {
            debug!("event={event} module=todo status=skipped reason=empty_id");
            return false;
        }
        let Some(index) = self.locate_bucket(process_id, day, task_id) else {
            debug!("event={event} module=todo status=skipped reason=not_found");
            return false;
        };
        let bucket = &mut self.buckets[index];
        let date = bucket.date;
        if let Some(task) = bucket.find_mut(task_id) {
            apply(task);
        }

        info!("event={event} module=todo status=ok process_id={process_id} date={date}");
        self.persist();
        true
    }

    /// Index of the bucket holding `task_id`, day bucket first.
    fn locate_bucket(&self, process_id: &str, day: NaiveDate, task_id: &str) -> Option<usize> {
        [BucketDate::Day(day), BucketDate::Fixed]
            .into_iter()
            .filter_map(|date| self.bucket_position(process_id, date))
            .find(|&index| self.buckets[index].contains(task_id))
    }

    fn bucket_position(&self, process_id: &str, date: BucketDate) -> Option<usize> {
        self.buckets
            .iter()
            .position(|bucket| bucket.matches(process_id, date))
    }

    fn bucket_or_insert(&mut self, process_id: &str, date: BucketDate) -> &mut DailyBucket {
        let index = match self.bucket_position(process_id, date) {
            Some(index) => index,
            None => {
                self.buckets.push(DailyBucket::new(process_id, date));
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[index]
    }

    fn sorted_bucket(&self, process_id: &str, date: BucketDate) -> Vec<Task> {
        if process_id.trim().is_empty() {
            return Vec::new();
        }
        self.bucket_position(process_id, date)
            .map(|index| self.buckets[index].sorted())
            .unwrap_or_default()
    }

    fn persist(&mut self) {
        write_through(
            &self.store,
            Collection::DailyTodos,
            &self.buckets,
            &mut self.status,
        );
    }
}

fn target_date(day: NaiveDate, is_fixed: bool) -> BucketDate {
    if is_fixed {
        BucketDate::Fixed
    } else {
        BucketDate::Day(day)
    }
}

fn load_source_label(source: LoadSource) -> &'static str {
    match source {
        LoadSource::Stored => "stored",
        LoadSource::Missing => "seed",
        LoadSource::Fallback => "seed_after_error",
    }
}

/// Folds buckets sharing one key into the first occurrence.
fn merge_duplicate_buckets(buckets: Vec<DailyBucket>) -> Vec<DailyBucket> {
    let mut merged: Vec<DailyBucket> = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        match merged
            .iter_mut()
            .find(|existing| existing.matches(&bucket.process_id, bucket.date))
        {
            Some(existing) => {
                warn!(
                    "event=todo_load module=todo status=merged_duplicate process_id={} date={}",
                    bucket.process_id, bucket.date
                );
                for task in bucket.todos {
                    if !existing.contains(&task.id) {
                        existing.todos.push(task);
                    }
                }
            }
            None => merged.push(bucket),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{merge_duplicate_buckets, CompletionStats, NewTask, TodoService};
    use crate::model::bucket::{BucketDate, DailyBucket};
    use crate::model::task::{Priority, Task};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn stats_round_to_nearest_percent() {
        let mut tasks = vec![
            Task::new("a", Priority::None),
            Task::new("b", Priority::None),
            Task::new("c", Priority::None),
        ];
        tasks[0].completed = true;
        let stats = CompletionStats::from_tasks(&tasks);
        assert_eq!(
            stats,
            CompletionStats {
                completed: 1,
                total: 3,
                percentage: 33
            }
        );

        tasks[1].completed = true;
        assert_eq!(CompletionStats::from_tasks(&tasks).percentage, 67);
        assert_eq!(
            CompletionStats::from_tasks(&Vec::<Task>::new()),
            CompletionStats::default()
        );
    }

    #[test]
    fn add_task_trims_and_appends_with_increasing_order() {
        let mut service = TodoService::new(MemoryStore::new());
        service
            .add_task("accounts", day(), NewTask::new("  first  ").description("   "))
            .unwrap();
        service
            .add_task("accounts", day(), NewTask::new("second"))
            .unwrap();

        let tasks = service.daily_tasks("accounts", day());
        assert_eq!(tasks[0].title, "first");
        assert_eq!(tasks[0].description, None);
        assert_eq!(tasks[0].order, Some(10));
        assert_eq!(tasks[1].order, Some(20));
    }

    #[test]
    fn blank_inputs_are_silent_noops() {
        let mut service = TodoService::new(MemoryStore::new());
        assert!(service.add_task("  ", day(), NewTask::new("x")).is_none());
        assert!(service.add_task("accounts", day(), NewTask::new(" ")).is_none());
        assert!(!service.toggle_task("accounts", day(), ""));
        assert!(!service.delete_task("", day(), "id"));
        assert!(service.buckets().is_empty());
        assert!(service.store().is_empty());
    }

    #[test]
    fn reorder_uses_display_order_and_clamps_destination() {
        let mut service = TodoService::new(MemoryStore::new());
        for title in ["a", "b", "c"] {
            service.add_task("accounts", day(), NewTask::new(title)).unwrap();
        }

        assert!(service.reorder_tasks("accounts", day(), 0, 99, false));
        let titles: Vec<String> = service
            .daily_tasks("accounts", day())
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
        assert!(!service.reorder_tasks("accounts", day(), 3, 0, false));
    }

    #[test]
    fn duplicate_buckets_are_merged_on_load() {
        let mut first = DailyBucket::new("accounts", BucketDate::Fixed);
        first.todos.push(Task::new("a", Priority::None));
        let mut second = DailyBucket::new("accounts", BucketDate::Fixed);
        second.todos.push(Task::new("b", Priority::None));
        second.todos.push(first.todos[0].clone());

        let merged = merge_duplicate_buckets(vec![first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].todos.len(), 2);
    }
}
