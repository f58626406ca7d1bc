//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record stored inside daily/fixed buckets.
//! - Provide identity generation and clone-forward helpers.
//!
//! # Invariants
//! - `title` is trimmed and non-empty for every task created through core.
//! - `id` is unique within one bucket; new ids are UUID v4 strings.
//! - A missing `order` sorts as `0`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Task identifier.
///
/// Kept as a plain string so ids written by earlier revisions (`"1"`,
/// `"yesterday-1"`) still load.
pub type TaskId = String;

/// Display priority of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a priority string is not one of `none|low|medium|high`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(pub String);

impl Display for ParsePriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported priority `{}`; expected none|low|medium|high",
            self.0
        )
    }
}

impl Error for ParsePriorityError {}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

/// One to-do entry.
///
/// Field names serialize in camelCase to match persisted documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Free-form display string such as `"30m"`; never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Task {
    /// Creates an incomplete task with a fresh id.
    ///
    /// Callers are expected to pass an already trimmed title.
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: generate_task_id(),
            title: title.into(),
            description: None,
            completed: false,
            priority,
            estimated_time: None,
            fixed: false,
            order: None,
        }
    }

    /// Order key used for display sorting.
    pub fn sort_key(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Copy used when carrying a task into another day.
    ///
    /// Only identity and completion change.
    pub fn clone_forward(&self) -> Self {
        Self {
            id: generate_task_id(),
            completed: false,
            ..self.clone()
        }
    }
}

/// Generates a new task id.
pub fn generate_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Trims `value`, returning `None` when nothing is left.
pub(crate) fn non_empty_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
