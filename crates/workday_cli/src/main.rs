use anyhow::{anyhow, Context};
use chrono::Utc;
use directories::ProjectDirs;
use log::{info, warn};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use structopt::StructOpt;
use workday_core::{
    init_logging, AccessGate, AppConfig, AppContext, DateCursor, DocumentStore, LoginOutcome,
};

mod cli;
mod interface;
mod views;

use cli::{Command, CommandLineArgs};
use interface::Flow;

fn find_default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "workday", "workday").map(|dirs| dirs.data_dir().to_path_buf())
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// Defaults, then `workday.json`, then `WORKDAY_*`, then flags.
fn resolve_config(args: &CommandLineArgs) -> anyhow::Result<AppConfig> {
    let data_dir = args
        .data_dir
        .clone()
        .or_else(find_default_data_dir)
        .ok_or_else(|| anyhow!("Failed to find a data directory; pass --data-dir."))?;
    let data_dir = absolute(&data_dir)?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create `{}`", data_dir.display()))?;

    let mut config = AppConfig::load(data_dir)?;
    config.apply_process_env()?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(user) = args.user.as_deref().map(str::trim).filter(|user| !user.is_empty()) {
        config.user_id = user.to_string();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn selected_cursor(args: &CommandLineArgs) -> DateCursor {
    let mut cursor = args.date.map(DateCursor::new).unwrap_or_default();
    if let Some(offset) = args.day_offset {
        cursor.add_days(offset);
    }
    cursor
}

fn read_passphrase() -> anyhow::Result<String> {
    eprint!("Passphrase: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Handles login/logout, or checks the session for every other command.
fn gate(store: &dyn DocumentStore, config: &AppConfig, action: &Command) -> anyhow::Result<Flow> {
    let gate = AccessGate::new(store, config.passphrase.clone());
    let now = Utc::now();
    match action {
        Command::Login { passphrase } => {
            let attempt = match passphrase {
                Some(passphrase) => passphrase.clone(),
                None => read_passphrase()?,
            };
            match gate.login(&attempt, now)? {
                LoginOutcome::Granted => {
                    println!("Unlocked.");
                    Ok(Flow::Done)
                }
                LoginOutcome::Rejected => {
                    eprintln!("Wrong passphrase.");
                    Ok(Flow::Rejected)
                }
            }
        }
        Command::Logout => {
            gate.logout()?;
            println!("Locked.");
            Ok(Flow::Done)
        }
        _ if gate.is_authenticated(now) => Ok(Flow::Done),
        _ => {
            eprintln!("Locked. Run `workday login` first.");
            Ok(Flow::Locked)
        }
    }
}

fn run(args: CommandLineArgs) -> anyhow::Result<Flow> {
    let config = resolve_config(&args)?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir().to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok backend={:?} user_id={}",
        config.backend, config.user_id
    );

    let store = config.open_store()?;
    let gate_flow = gate(&*store, &config, &args.action)?;
    if args.action.skips_gate() || gate_flow != Flow::Done {
        return Ok(gate_flow);
    }

    let mut app = AppContext::load(store, selected_cursor(&args));
    let flow = interface::run(&mut app, args.action)?;

    let status = app.sync_status();
    if status.is_failed() {
        warn!("event=cli_sync module=cli status=error");
        eprintln!("warning: {status}; changes are kept for this run only");
    }
    Ok(flow)
}

fn main() -> anyhow::Result<()> {
    let result = run(CommandLineArgs::from_args());
    log::logger().flush();
    match result? {
        Flow::Done => Ok(()),
        flow => std::process::exit(flow.exit_code()),
    }
}
