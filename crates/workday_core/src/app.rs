//! Application context: cursor, task store and process registry together.
//!
//! # Invariants
//! - Every day-scoped call uses the cursor's selected date.
//! - Deleting a custom process also purges its buckets; hiding a built-in
//!   keeps them for a later restore.

use crate::date_cursor::{utc_today, DateCursor};
use crate::model::process::WorkProcess;
use crate::model::task::{Priority, Task, TaskId};
use crate::service::process_service::{NewProcess, ProcessRegistry, ProcessRemoval};
use crate::service::todo_service::{CompletionStats, NewTask, TodoService};
use crate::storage::{DocumentStore, SyncStatus};
use std::rc::Rc;

/// Process plus its completion summary for the selected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub process: WorkProcess,
    pub stats: CompletionStats,
}

pub struct AppContext<S: DocumentStore> {
    cursor: DateCursor,
    todos: TodoService<Rc<S>>,
    processes: ProcessRegistry<Rc<S>>,
}

impl<S: DocumentStore> AppContext<S> {
    /// Loads todos and processes from `store` with the cursor at `cursor`.
    ///
    /// A missing task document is seeded around the current UTC date, not
    /// the selected one.
    pub fn load(store: S, cursor: DateCursor) -> Self {
        let store = Rc::new(store);
        let todos = TodoService::load(Rc::clone(&store), utc_today());
        let processes = ProcessRegistry::load(store);
        Self {
            cursor,
            todos,
            processes,
        }
    }

    pub fn cursor(&self) -> &DateCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut DateCursor {
        &mut self.cursor
    }

    pub fn todos(&self) -> &TodoService<Rc<S>> {
        &self.todos
    }

    pub fn processes(&self) -> &ProcessRegistry<Rc<S>> {
        &self.processes
    }

    /// Failed when either the task or the process documents failed to save.
    pub fn sync_status(&self) -> SyncStatus {
        self.todos
            .sync_status()
            .clone()
            .combine(self.processes.sync_status().clone())
    }

    pub fn process_summaries(&self) -> Vec<ProcessSummary> {
        let day = self.cursor.selected();
        self.processes
            .list()
            .into_iter()
            .map(|process| ProcessSummary {
                stats: self.todos.completion_stats(&process.id, day),
                process: process.clone(),
            })
            .collect()
    }

    /// Ensures every visible process has a bucket for the selected day.
    pub fn initialize_selected_date(&mut self) -> usize {
        let ids: Vec<String> = self
            .processes
            .list()
            .into_iter()
            .map(|process| process.id.clone())
            .collect();
        self.todos.initialize_date(ids, self.cursor.selected())
    }

    pub fn add_task(&mut self, process_id: &str, new_task: NewTask) -> Option<TaskId> {
        self.todos
            .add_task(process_id, self.cursor.selected(), new_task)
    }

    pub fn toggle_task(&mut self, process_id: &str, task_id: &str) -> bool {
        self.todos
            .toggle_task(process_id, self.cursor.selected(), task_id)
    }

    pub fn delete_task(&mut self, process_id: &str, task_id: &str) -> bool {
        self.todos
            .delete_task(process_id, self.cursor.selected(), task_id)
    }

    pub fn update_task(
        &mut self,
        process_id: &str,
        task_id: &str,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> bool {
        self.todos.update_task(
            process_id,
            self.cursor.selected(),
            task_id,
            title,
            description,
            priority,
        )
    }

    pub fn update_task_priority(
        &mut self,
        process_id: &str,
        task_id: &str,
        priority: Priority,
    ) -> bool {
        self.todos
            .update_task_priority(process_id, self.cursor.selected(), task_id, priority)
    }

    pub fn update_task_order(
        &mut self,
        process_id: &str,
        task_id: &str,
        new_order: i64,
        is_fixed: bool,
    ) -> bool {
        self.todos.update_task_order(
            process_id,
            self.cursor.selected(),
            task_id,
            new_order,
            is_fixed,
        )
    }

    pub fn reorder_tasks(
        &mut self,
        process_id: &str,
        source_index: usize,
        destination_index: usize,
        is_fixed: bool,
    ) -> bool {
        self.todos.reorder_tasks(
            process_id,
            self.cursor.selected(),
            source_index,
            destination_index,
            is_fixed,
        )
    }

    pub fn daily_tasks(&self, process_id: &str) -> Vec<Task> {
        self.todos.daily_tasks(process_id, self.cursor.selected())
    }

    pub fn fixed_tasks(&self, process_id: &str) -> Vec<Task> {
        self.todos.fixed_tasks(process_id)
    }

    pub fn tasks_for_process(&self, process_id: &str) -> Vec<Task> {
        self.todos
            .tasks_for_process(process_id, self.cursor.selected())
    }

    pub fn copy_from_previous_day(&mut self, process_id: &str) -> usize {
        self.todos
            .copy_from_previous_day(process_id, self.cursor.selected())
    }

    pub fn completion_stats(&self, process_id: &str) -> CompletionStats {
        self.todos
            .completion_stats(process_id, self.cursor.selected())
    }

    pub fn add_process(&mut self, new_process: NewProcess) -> Option<String> {
        self.processes.add_process(new_process)
    }

    pub fn edit_process(&mut self, id: &str, title: &str, description: &str) -> bool {
        self.processes.edit_process(id, title, description)
    }

    /// Hides or removes a process; removal also drops its task buckets.
    pub fn delete_process(&mut self, id: &str) -> ProcessRemoval {
        let removal = self.processes.delete_process(id);
        if removal == ProcessRemoval::Removed {
            self.todos.remove_process(id);
        }
        removal
    }

    pub fn restore_process(&mut self, id: &str) -> bool {
        self.processes.restore_process(id)
    }
}
