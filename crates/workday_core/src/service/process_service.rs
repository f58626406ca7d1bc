//! Process registry: built-in and user-created work processes.
//!
//! # Responsibility
//! - Keep the ordered process list plus the set of hidden built-in ids.
//! - Write the `allProcesses`, `customProcesses` and `hiddenProcesses`
//!   documents after every change.
//!
//! # Invariants
//! - Built-in processes are never removed, only hidden.
//! - Custom processes are removed outright on delete.
//! - Process ids are unique across the whole list.

use crate::model::process::{
    builtin_processes, is_builtin_process, is_hex_color, slugify, WorkProcess,
};
use crate::model::task::non_empty_trimmed;
use crate::storage::{
    load_or_default, write_through, Collection, DocumentStore, LoadSource, SyncStatus,
};
use log::{debug, info};

const DEFAULT_ICON: &str = "ListChecks";

/// Input for `ProcessRegistry::add_process`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProcess {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub gradient: Option<[String; 2]>,
}

/// What `delete_process` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessRemoval {
    /// Built-in process hidden; its tasks are kept.
    Hidden,
    /// Custom process removed.
    Removed,
    NotFound,
}

pub struct ProcessRegistry<S: DocumentStore> {
    store: S,
    processes: Vec<WorkProcess>,
    hidden: Vec<String>,
    status: SyncStatus,
}

impl<S: DocumentStore> ProcessRegistry<S> {
    /// Registry holding only the built-ins, without touching `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            processes: builtin_processes(),
            hidden: Vec::new(),
            status: SyncStatus::Synced,
        }
    }

    /// Loads the process documents from `store`.
    ///
    /// When `allProcesses` does not exist yet, built-in defaults are used and
    /// written back immediately.
    pub fn load(store: S) -> Self {
        let all = load_or_default(&store, Collection::AllProcesses, Vec::<WorkProcess>::new);
        let custom = load_or_default(&store, Collection::CustomProcesses, Vec::<WorkProcess>::new);
        let hidden = load_or_default(&store, Collection::HiddenProcesses, Vec::<String>::new);

        let needs_init = all.source != LoadSource::Stored || all.value.is_empty();
        let mut processes = if needs_init {
            builtin_processes()
        } else {
            all.value
        };
        for process in custom.value {
            if !processes.iter().any(|existing| existing.id == process.id) {
                processes.push(process);
            }
        }

        let mut registry = Self {
            store,
            processes,
            hidden: hidden.value,
            status: SyncStatus::Synced,
        };
        info!(
            "event=process_load module=process status=ok backend={} processes={} hidden={}",
            registry.store.backend_name(),
            registry.processes.len(),
            registry.hidden.len()
        );
        if needs_init {
            registry.persist();
        }
        registry
    }

    pub fn sync_status(&self) -> &SyncStatus {
        &self.status
    }

    /// Visible processes in list order.
    pub fn list(&self) -> Vec<&WorkProcess> {
        self.processes
            .iter()
            .filter(|process| !self.is_hidden(&process.id))
            .collect()
    }

    /// Visible process by id.
    pub fn get(&self, id: &str) -> Option<&WorkProcess> {
        self.processes
            .iter()
            .find(|process| process.id == id)
            .filter(|process| !self.is_hidden(&process.id))
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.iter().any(|hidden| hidden == id)
    }

    pub fn hidden_ids(&self) -> &[String] {
        &self.hidden
    }

    /// Non-built-in processes.
    pub fn custom_processes(&self) -> Vec<WorkProcess> {
        self.processes
            .iter()
            .filter(|process| !is_builtin_process(&process.id))
            .cloned()
            .collect()
    }

    /// Adds a custom process and returns its id.
    ///
    /// Blank titles and colors other than `#RRGGBB` are rejected.
    pub fn add_process(&mut self, new_process: NewProcess) -> Option<String> {
        let Some(title) = non_empty_trimmed(&new_process.title) else {
            debug!("event=process_add module=process status=skipped reason=empty_title");
            return None;
        };
        let color = new_process.color.trim().to_string();
        if !is_hex_color(&color) {
            debug!("event=process_add module=process status=skipped reason=invalid_color");
            return None;
        }
        let gradient = match new_process.gradient {
            Some([from, to]) if is_hex_color(&from) && is_hex_color(&to) => [from, to],
            Some(_) => {
                debug!("event=process_add module=process status=skipped reason=invalid_gradient");
                return None;
            }
            None => [color.clone(), color.clone()],
        };

        let id = self.unique_id(&title);
        let icon =
            non_empty_trimmed(&new_process.icon).unwrap_or_else(|| DEFAULT_ICON.to_string());
        self.processes.push(WorkProcess {
            id: id.clone(),
            title,
            description: new_process.description.trim().to_string(),
            icon,
            color,
            gradient,
        });

        info!("event=process_add module=process status=ok process_id={id}");
        self.persist();
        Some(id)
    }

    /// Replaces title and description. Blank titles and unknown ids are no-ops.
    pub fn edit_process(&mut self, id: &str, title: &str, description: &str) -> bool {
        let Some(title) = non_empty_trimmed(title) else {
            return false;
        };
        let Some(process) = self.processes.iter_mut().find(|process| process.id == id) else {
            debug!("event=process_edit module=process status=skipped reason=not_found");
            return false;
        };
        process.title = title;
        process.description = description.trim().to_string();

        info!("event=process_edit module=process status=ok process_id={id}");
        self.persist();
        true
    }

    /// Hides a built-in process or removes a custom one.
    pub fn delete_process(&mut self, id: &str) -> ProcessRemoval {
        let Some(index) = self.processes.iter().position(|process| process.id == id) else {
            return ProcessRemoval::NotFound;
        };

        let removal = if is_builtin_process(id) {
            if self.is_hidden(id) {
                return ProcessRemoval::Hidden;
            }
            self.hidden.push(id.to_string());
            ProcessRemoval::Hidden
        } else {
            self.processes.remove(index);
            ProcessRemoval::Removed
        };

        info!("event=process_delete module=process status=ok process_id={id} removal={removal:?}");
        self.persist();
        removal
    }

    /// Un-hides a built-in process.
    pub fn restore_process(&mut self, id: &str) -> bool {
        let before = self.hidden.len();
        self.hidden.retain(|hidden| hidden != id);
        if self.hidden.len() == before {
            return false;
        }
        info!("event=process_restore module=process status=ok process_id={id}");
        self.persist();
        true
    }

    fn unique_id(&self, title: &str) -> String {
        let base = match slugify(title) {
            slug if slug.is_empty() => "process".to_string(),
            slug => slug,
        };
        let taken = |candidate: &str| self.processes.iter().any(|process| process.id == candidate);
        if !taken(&base) {
            return base;
        }
        let mut suffix = 2u32;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn persist(&mut self) {
        let custom = self.custom_processes();
        let mut all_status = SyncStatus::Synced;
        let mut custom_status = SyncStatus::Synced;
        let mut hidden_status = SyncStatus::Synced;
        write_through(
            &self.store,
            Collection::AllProcesses,
            &self.processes,
            &mut all_status,
        );
        write_through(
            &self.store,
            Collection::CustomProcesses,
            &custom,
            &mut custom_status,
        );
        write_through(
            &self.store,
            Collection::HiddenProcesses,
            &self.hidden,
            &mut hidden_status,
        );
        self.status = all_status.combine(custom_status).combine(hidden_status);
    }
}
