use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Execution status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Blocked => "blocked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "blocked" => Some(TaskStatus::Blocked),
            _ => None,
        }
    }
}

/// Priority level, used for grouping and display accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Urgent,
    High,
    Normal,
    Low,
    None,
}

impl TaskPriority {
    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Urgent => "urgent",
            TaskPriority::High => "high",
            TaskPriority::Normal => "normal",
            TaskPriority::Low => "low",
            TaskPriority::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "urgent" => Some(TaskPriority::Urgent),
            "high" => Some(TaskPriority::High),
            "normal" => Some(TaskPriority::Normal),
            "low" => Some(TaskPriority::Low),
            "none" => Some(TaskPriority::None),
            _ => None,
        }
    }
}

/// Which task field drives lane grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Owner,
    Status,
    Priority,
}

impl GroupBy {
    pub fn label(self) -> &'static str {
        match self {
            GroupBy::Owner => "Owner",
            GroupBy::Status => "Status",
            GroupBy::Priority => "Priority",
        }
    }
}

/// A single work item in the timeline.
///
/// Tasks form a forest via `parent_id`; the engine never assumes the forest
/// is actually acyclic (upstream data can be malformed), so every traversal
/// over it is visited-set guarded. Dates are midnight-normalized at
/// ingestion; day offsets are derived per layout pass, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub owner_key: String,
    pub parent_id: Option<String>,
    pub start: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task with defaults; used by demo data and tests.
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_key: owner.into(),
            parent_id: None,
            start: None,
            due: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Normal,
            updated_at: None,
        }
    }

    /// The grouping value for the given key. Statuses and priorities use
    /// their stable lowercase labels so lexicographic group ordering stays
    /// deterministic across runs.
    pub fn group_value(&self, key: GroupBy) -> &str {
        match key {
            GroupBy::Owner => &self.owner_key,
            GroupBy::Status => self.status.label(),
            GroupBy::Priority => self.priority.label(),
        }
    }
}
