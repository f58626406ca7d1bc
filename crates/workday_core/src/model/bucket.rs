//! Task buckets keyed by `(process_id, date)`.
//!
//! # Invariants
//! - At most one bucket exists per `(process_id, BucketDate)` pair.
//! - `BucketDate::Fixed` is stored as the literal `"fixed"`.
//! - Display order is ascending `Task::sort_key()`, ties keep insertion order.

use crate::model::task::Task;
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

pub const FIXED_DATE_LITERAL: &str = "fixed";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date component of a bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketDate {
    /// Recurs every day.
    Fixed,
    Day(NaiveDate),
}

impl BucketDate {
    pub fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed)
    }
}

impl Display for BucketDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => f.write_str(FIXED_DATE_LITERAL),
            Self::Day(day) => write!(f, "{}", day.format(ISO_DATE_FORMAT)),
        }
    }
}

impl From<NaiveDate> for BucketDate {
    fn from(value: NaiveDate) -> Self {
        Self::Day(value)
    }
}

impl Serialize for BucketDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BucketDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == FIXED_DATE_LITERAL {
            return Ok(Self::Fixed);
        }
        NaiveDate::parse_from_str(&raw, ISO_DATE_FORMAT)
            .map(Self::Day)
            .map_err(|_| de::Error::custom(format!("invalid bucket date `{raw}`")))
    }
}

/// Tasks for one process on one date (or the fixed list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub process_id: String,
    pub date: BucketDate,
    #[serde(default)]
    pub todos: Vec<Task>,
}

impl DailyBucket {
    pub fn new(process_id: impl Into<String>, date: BucketDate) -> Self {
        Self {
            process_id: process_id.into(),
            date,
            todos: Vec::new(),
        }
    }

    pub fn matches(&self, process_id: &str, date: BucketDate) -> bool {
        self.process_id == process_id && self.date == date
    }

    /// Tasks in display order.
    pub fn sorted(&self) -> Vec<Task> {
        let mut tasks = self.todos.clone();
        // `sort_by_key` is stable, which keeps insertion order on ties.
        tasks.sort_by_key(Task::sort_key);
        tasks
    }

    /// Order key for a task appended at the end of this bucket.
    pub fn next_order(&self) -> i64 {
        self.todos
            .iter()
            .map(Task::sort_key)
            .max()
            .map_or(10, |max| max + 10)
    }

    pub fn find_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.todos.iter_mut().find(|task| task.id == task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.todos.iter().any(|task| task.id == task_id)
    }
}
