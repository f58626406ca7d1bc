use chrono::NaiveDate;
use std::path::PathBuf;
use structopt::StructOpt;
use workday_core::{parse_iso_date, Backend, Priority};

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).ok_or_else(|| format!("expected YYYY-MM-DD, got `{value}`"))
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Unlock the tracker for 24 hours.
    Login {
        /// Read from stdin when omitted.
        passphrase: Option<String>,
    },
    /// Drop the current session.
    Logout,
    /// List visible processes with completion for the selected day.
    Processes,
    /// Show fixed and daily tasks of one process.
    Show {
        process: String,
    },
    /// Add a task to a process.
    Add {
        process: String,
        title: String,
        #[structopt(short, long, default_value = "")]
        description: String,
        /// none, low, medium or high.
        #[structopt(short, long, default_value = "none")]
        priority: Priority,
        /// Free-form estimate such as `30m`.
        #[structopt(short, long)]
        estimate: Option<String>,
        /// Show the task on every day instead of the selected one.
        #[structopt(long)]
        fixed: bool,
    },
    /// Flip a task between done and open.
    Toggle {
        process: String,
        /// Position from `show`, full id or unique id prefix.
        task: String,
    },
    /// Delete a task.
    Delete {
        process: String,
        task: String,
    },
    /// Replace a task's title, description and priority.
    Edit {
        process: String,
        task: String,
        title: String,
        /// Keeps the current description when omitted.
        #[structopt(short, long)]
        description: Option<String>,
        /// Keeps the current priority when omitted.
        #[structopt(short, long)]
        priority: Option<Priority>,
    },
    /// Change a task's priority.
    #[structopt(name = "priority")]
    SetPriority {
        process: String,
        task: String,
        priority: Priority,
    },
    /// Set a task's raw order key.
    Order {
        process: String,
        task: String,
        #[structopt(allow_hyphen_values = true)]
        order: i64,
    },
    /// Move a task from one position to another.
    Move {
        process: String,
        from: usize,
        to: usize,
        /// Reorder the fixed list instead of the day list.
        #[structopt(long)]
        fixed: bool,
    },
    /// Copy the previous day's tasks into the selected day.
    CopyPrev {
        process: String,
    },
    /// Print completion for one process.
    Stats {
        process: String,
    },
    /// Create empty day lists for every visible process.
    InitDay,
    /// Create a custom process.
    ProcessAdd {
        title: String,
        #[structopt(short, long, default_value = "")]
        description: String,
        /// `#RRGGBB` accent color.
        #[structopt(short, long, default_value = "#3B82F6")]
        color: String,
        /// Named icon or emoji.
        #[structopt(short, long, default_value = "")]
        icon: String,
    },
    /// Rename a process.
    ProcessEdit {
        id: String,
        title: String,
        #[structopt(short, long, default_value = "")]
        description: String,
    },
    /// Remove a custom process or hide a built-in one.
    ProcessDelete {
        id: String,
    },
    /// Show a hidden built-in process again.
    ProcessRestore {
        id: String,
    },
}

impl Command {
    /// Commands allowed while the gate is locked.
    pub fn skips_gate(&self) -> bool {
        matches!(self, Command::Login { .. } | Command::Logout)
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "workday", about = "Per-day to-do lists for work processes.")]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Command,

    /// Directory holding config, documents and logs.
    #[structopt(parse(from_os_str), long)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: local or document.
    #[structopt(short, long)]
    pub backend: Option<Backend>,

    /// User id for the document backend.
    #[structopt(short, long)]
    pub user: Option<String>,

    /// trace, debug, info, warn, error or off.
    #[structopt(long)]
    pub log_level: Option<String>,

    /// Selected date as YYYY-MM-DD. Defaults to today (UTC).
    #[structopt(long, parse(try_from_str = parse_date))]
    pub date: Option<NaiveDate>,

    /// Days to step from the selected date, e.g. `--day-offset=-1`.
    #[structopt(long, allow_hyphen_values = true)]
    pub day_offset: Option<i64>,
}
