use crate::cli::Command;
use crate::views;
use anyhow::{anyhow, bail};
use log::info;
use workday_core::{
    AppContext, DocumentStore, NewProcess, NewTask, ProcessRemoval, Task, WorkProcess,
};

pub type App = AppContext<Box<dyn DocumentStore>>;

/// How a command ended, mapped to the process exit code by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Done,
    NotFound,
    Locked,
    Rejected,
}

impl Flow {
    pub fn exit_code(self) -> i32 {
        match self {
            Flow::Done => 0,
            Flow::NotFound => 2,
            Flow::Locked => 3,
            Flow::Rejected => 4,
        }
    }
}

/// Runs one tracker command against `app`.
pub fn run(app: &mut App, action: Command) -> anyhow::Result<Flow> {
    let date = app.cursor().selected_iso();
    match action {
        Command::Processes => {
            views::processes(&app.process_summaries(), &date);
            Ok(Flow::Done)
        }
        Command::Show { process } => {
            let Some(found) = visible_process(app, &process) else {
                return Ok(not_found(&process));
            };
            views::process(&found, &app.fixed_tasks(&process), &app.daily_tasks(&process), &date);
            Ok(Flow::Done)
        }
        Command::Stats { process } => {
            let Some(found) = visible_process(app, &process) else {
                return Ok(not_found(&process));
            };
            views::stats(&found, &app.completion_stats(&process), &date);
            Ok(Flow::Done)
        }
        Command::Add {
            process,
            title,
            description,
            priority,
            estimate,
            fixed,
        } => {
            if visible_process(app, &process).is_none() {
                return Ok(not_found(&process));
            }
            let mut new_task = NewTask::new(title)
                .description(description)
                .priority(priority);
            if let Some(estimate) = estimate {
                new_task = new_task.estimated_time(estimate);
            }
            if fixed {
                new_task = new_task.fixed();
            }
            let id = app
                .add_task(&process, new_task)
                .ok_or_else(|| anyhow!("task title cannot be empty"))?;
            println!("Added {id}");
            Ok(Flow::Done)
        }
        Command::Toggle { process, task } => with_task(app, &process, &task, |app, task, _| {
            app.toggle_task(&process, &task.id);
            let state = if task.completed { "open" } else { "done" };
            println!("{} is now {state}", task.title);
        }),
        Command::Delete { process, task } => with_task(app, &process, &task, |app, task, _| {
            app.delete_task(&process, &task.id);
            println!("Deleted {}", task.title);
        }),
        Command::Edit {
            process,
            task,
            title,
            description,
            priority,
        } => {
            let mut updated = false;
            let flow = with_task(app, &process, &task, |app, task, _| {
                let description = description
                    .or_else(|| task.description.clone())
                    .unwrap_or_default();
                let priority = priority.unwrap_or(task.priority);
                updated = app.update_task(&process, &task.id, &title, &description, priority);
            })?;
            if flow == Flow::Done && !updated {
                bail!("task title cannot be empty");
            }
            Ok(flow)
        }
        Command::SetPriority {
            process,
            task,
            priority,
        } => with_task(app, &process, &task, |app, task, _| {
            app.update_task_priority(&process, &task.id, priority);
            println!("{} priority set to {priority}", task.title);
        }),
        Command::Order {
            process,
            task,
            order,
        } => {
            let mut updated = false;
            let flow = with_task(app, &process, &task, |app, task, section| {
                updated = app.update_task_order(&process, &task.id, order, section.is_fixed());
            })?;
            if flow == Flow::Done && !updated {
                bail!("order of task `{task}` was not changed");
            }
            Ok(flow)
        }
        Command::Move {
            process,
            from,
            to,
            fixed,
        } => {
            if visible_process(app, &process).is_none() {
                return Ok(not_found(&process));
            }
            let fixed_len = app.fixed_tasks(&process).len();
            let section = if fixed { Section::Fixed } else { Section::Daily };
            let source = section.index_of(from, fixed_len)?;
            let destination = section.index_of(to, fixed_len)?;
            if !app.reorder_tasks(&process, source, destination, fixed) {
                bail!("no task at position {from}");
            }
            Ok(Flow::Done)
        }
        Command::CopyPrev { process } => {
            if visible_process(app, &process).is_none() {
                return Ok(not_found(&process));
            }
            match app.copy_from_previous_day(&process) {
                0 => println!("Nothing to copy from the previous day."),
                copied => println!("Copied {copied} task(s) into {date}"),
            }
            Ok(Flow::Done)
        }
        Command::InitDay => {
            let created = app.initialize_selected_date();
            println!("Prepared {created} empty list(s) for {date}");
            Ok(Flow::Done)
        }
        Command::ProcessAdd {
            title,
            description,
            color,
            icon,
        } => {
            let id = app
                .add_process(NewProcess {
                    title,
                    description,
                    icon,
                    color,
                    gradient: None,
                })
                .ok_or_else(|| anyhow!("process needs a title and a #RRGGBB color"))?;
            println!("Added process {id}");
            Ok(Flow::Done)
        }
        Command::ProcessEdit {
            id,
            title,
            description,
        } => {
            if visible_process(app, &id).is_none() {
                return Ok(not_found(&id));
            }
            if !app.edit_process(&id, &title, &description) {
                bail!("process title cannot be empty");
            }
            Ok(Flow::Done)
        }
        Command::ProcessDelete { id } => match app.delete_process(&id) {
            ProcessRemoval::Hidden => {
                println!("Hid {id}; restore it with `workday process-restore {id}`");
                Ok(Flow::Done)
            }
            ProcessRemoval::Removed => {
                println!("Removed {id} and its tasks");
                Ok(Flow::Done)
            }
            ProcessRemoval::NotFound => Ok(not_found(&id)),
        },
        Command::ProcessRestore { id } => {
            if !app.restore_process(&id) {
                return Ok(not_found(&id));
            }
            println!("Restored {id}");
            Ok(Flow::Done)
        }
        Command::Login { .. } | Command::Logout => {
            Err(anyhow!("session commands are handled before loading tasks"))
        }
    }
}

fn visible_process(app: &App, id: &str) -> Option<WorkProcess> {
    app.processes().get(id).cloned()
}

fn not_found(process_id: &str) -> Flow {
    info!("event=view_not_found module=cli status=ok");
    views::not_found(process_id);
    Flow::NotFound
}

/// List of the task view a position falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Fixed,
    Daily,
}

impl Section {
    fn of(index: usize, fixed_len: usize) -> Self {
        if index < fixed_len {
            Section::Fixed
        } else {
            Section::Daily
        }
    }

    fn is_fixed(self) -> bool {
        self == Section::Fixed
    }

    /// Bucket index for a 1-based position as numbered by `views::process`.
    ///
    /// Positions past the end of the daily list are kept so the store can
    /// clamp them; positions inside the other list are rejected.
    fn index_of(self, position: usize, fixed_len: usize) -> anyhow::Result<usize> {
        let Some(index) = position.checked_sub(1) else {
            bail!("positions start at 1");
        };
        match (self, Section::of(index, fixed_len)) {
            (Section::Fixed, Section::Fixed) => Ok(index),
            (Section::Daily, Section::Daily) => Ok(index - fixed_len),
            (Section::Fixed, Section::Daily) => bail!("position {position} is not a fixed task"),
            (Section::Daily, Section::Fixed) => {
                bail!("position {position} is a fixed task; pass --fixed")
            }
        }
    }
}

/// Resolves `reference` inside `process` and hands the task to `apply`.
fn with_task(
    app: &mut App,
    process: &str,
    reference: &str,
    apply: impl FnOnce(&mut App, &Task, Section),
) -> anyhow::Result<Flow> {
    if visible_process(app, process).is_none() {
        return Ok(not_found(process));
    }
    let tasks = app.tasks_for_process(process);
    let index = resolve_task(&tasks, reference)?;
    let section = Section::of(index, app.fixed_tasks(process).len());
    apply(app, &tasks[index], section);
    Ok(Flow::Done)
}

/// Matches a 1-based position, a full id or a unique id prefix.
fn resolve_task(tasks: &[Task], reference: &str) -> anyhow::Result<usize> {
    let reference = reference.trim();
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(index) = position.checked_sub(1).filter(|&index| index < tasks.len()) {
            return Ok(index);
        }
    }
    if let Some(index) = tasks.iter().position(|task| task.id == reference) {
        return Ok(index);
    }

    let mut matches = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| !reference.is_empty() && task.id.starts_with(reference))
        .map(|(index, _)| index);
    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (Some(_), Some(_)) => Err(anyhow!("task reference `{reference}` is ambiguous")),
        (None, _) => Err(anyhow!("no task matches `{reference}`")),
    }
}
