use prettytable::{row, Table};
use workday_core::{CompletionStats, ProcessSummary, Task, WorkProcess};

const SHORT_ID_CHARS: usize = 8;

/// Process list with one completion row per process.
pub fn processes(summaries: &[ProcessSummary], date: &str) {
    println!("Processes for {date}");
    let mut table = Table::new();
    table.add_row(row!["id", "process", "done", "progress"]);
    for summary in summaries {
        table.add_row(row![
            summary.process.id,
            summary.process.title,
            format!("{}/{}", summary.stats.completed, summary.stats.total),
            progress_bar(summary.stats.percentage),
        ]);
    }
    table.printstd();
}

/// Task view: fixed tasks first, then the selected day.
///
/// Positions are 1-based and run on from the fixed list into the daily list.
/// `move` translates them back into one list.
pub fn process(process: &WorkProcess, fixed: &[Task], daily: &[Task], date: &str) {
    println!("{} ({date})", process.title);
    if !process.description.is_empty() {
        println!("{}", process.description);
    }

    let mut table = Table::new();
    table.add_row(row!["#", "", "task", "priority", "estimate", "id"]);
    for (position, task) in fixed.iter().chain(daily).enumerate() {
        table.add_row(row![
            position + 1,
            checkbox(task),
            task_label(task),
            task.priority,
            task.estimated_time.as_deref().unwrap_or(""),
            short_id(&task.id),
        ]);
    }
    if fixed.is_empty() && daily.is_empty() {
        println!("No tasks yet. Add one with `workday add {} <title>`.", process.id);
    } else {
        table.printstd();
    }
}

pub fn stats(process: &WorkProcess, stats: &CompletionStats, date: &str) {
    println!(
        "{} on {date}: {}/{} done {}",
        process.title,
        stats.completed,
        stats.total,
        progress_bar(stats.percentage)
    );
}

pub fn not_found(process_id: &str) {
    println!("Process `{process_id}` not found.");
    println!("Run `workday processes` to see the available processes.");
}

fn checkbox(task: &Task) -> &'static str {
    if task.completed {
        "[x]"
    } else {
        "[ ]"
    }
}

fn task_label(task: &Task) -> String {
    let mut label = task.title.clone();
    if task.fixed {
        label.push_str(" (fixed)");
    }
    if let Some(description) = &task.description {
        label.push('\n');
        label.push_str(description);
    }
    label
}

fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_CHARS).collect()
}

fn progress_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) / 10) as usize;
    format!(
        "{}{} {percentage}%",
        "#".repeat(filled),
        ".".repeat(10 - filled)
    )
}
