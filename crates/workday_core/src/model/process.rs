//! Work process model and built-in defaults.
//!
//! # Invariants
//! - `id` is stable; tasks reference processes only by id.
//! - `color` and both gradient stops are `#RRGGBB` strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));
static SLUG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// A named lane of work shown as one card in the process list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkProcess {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Named icon (`ListChecks`) or an emoji.
    pub icon: String,
    pub color: String,
    /// Card background as `[from, to]`.
    pub gradient: [String; 2],
}

/// How `WorkProcess::icon` should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Named,
    Emoji,
}

impl WorkProcess {
    pub fn icon_kind(&self) -> IconKind {
        if !self.icon.is_empty() && self.icon.chars().all(|c| c.is_ascii_alphanumeric()) {
            IconKind::Named
        } else {
            IconKind::Emoji
        }
    }
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Lowercase, dash-separated id derived from a title.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    SLUG_SEPARATOR_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Processes shipped with the application.
pub fn builtin_processes() -> Vec<WorkProcess> {
    vec![
        builtin(
            "daily-todos",
            "Daily To Do's",
            "Manage your daily tasks and priorities",
            "ListChecks",
            ["#8B5CF6", "#7C3AED"],
        ),
        builtin(
            "onboarding",
            "Onboarding Partners",
            "Welcome new partners and set them up for success",
            "UserPlus",
            ["#3B82F6", "#1D4ED8"],
        ),
        builtin(
            "accounts",
            "Managing Accounts",
            "Maintain and grow existing client relationships",
            "Users",
            ["#10B981", "#059669"],
        ),
    ]
}

pub fn is_builtin_process(id: &str) -> bool {
    matches!(id, "daily-todos" | "onboarding" | "accounts")
}

fn builtin(id: &str, title: &str, description: &str, icon: &str, gradient: [&str; 2]) -> WorkProcess {
    WorkProcess {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        color: gradient[0].to_string(),
        gradient: [gradient[0].to_string(), gradient[1].to_string()],
    }
}
