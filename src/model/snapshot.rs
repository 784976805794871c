use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::engine::warnings::LayoutWarning;

use super::task::{Task, TaskPriority, TaskStatus};

/// A task exactly as a collaborator hands it over, before any validation.
/// Timestamps arrive as strings so a bad value degrades to a warning instead
/// of a deserialization failure for the whole snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTask {
    pub id: String,
    pub name: String,
    pub owner_key: String,
    pub start_timestamp: Option<String>,
    pub due_timestamp: Option<String>,
    pub parent_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub updated_at: Option<String>,
}

/// Convert a raw snapshot into typed tasks.
///
/// Total over any input: unparseable dates become `None` (the grid mapper
/// then applies its deterministic fallback placement), unknown status or
/// priority strings fall back to their defaults, and every anomaly is both
/// logged and returned so the caller can surface data-quality issues.
pub fn build_snapshot(raw: &[RawTask]) -> (Vec<Task>, Vec<LayoutWarning>) {
    let mut warnings = Vec::new();
    let mut tasks = Vec::with_capacity(raw.len());

    for item in raw {
        let start = parse_date(item.start_timestamp.as_deref(), &item.id, "start", &mut warnings);
        let due = parse_date(item.due_timestamp.as_deref(), &item.id, "due", &mut warnings);

        let status = match item.status.as_deref() {
            None => TaskStatus::Todo,
            Some(s) => TaskStatus::parse(s).unwrap_or_else(|| {
                let w = LayoutWarning::UnknownStatus {
                    task_id: item.id.clone(),
                    value: s.to_string(),
                };
                warn!(task = %item.id, value = s, "unknown status, falling back to todo");
                warnings.push(w);
                TaskStatus::Todo
            }),
        };

        let priority = match item.priority.as_deref() {
            None => TaskPriority::None,
            Some(p) => TaskPriority::parse(p).unwrap_or_else(|| {
                let w = LayoutWarning::UnknownPriority {
                    task_id: item.id.clone(),
                    value: p.to_string(),
                };
                warn!(task = %item.id, value = p, "unknown priority, falling back to none");
                warnings.push(w);
                TaskPriority::None
            }),
        };

        let updated_at = item
            .updated_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        tasks.push(Task {
            id: item.id.clone(),
            name: item.name.clone(),
            owner_key: item.owner_key.clone(),
            parent_id: item.parent_id.clone(),
            start,
            due,
            status,
            priority,
            updated_at,
        });
    }

    (tasks, warnings)
}

/// Parse a raw timestamp and normalize it to midnight. Accepts RFC 3339,
/// a bare datetime, or a plain date.
fn parse_date(
    value: Option<&str>,
    task_id: &str,
    field: &'static str,
    warnings: &mut Vec<LayoutWarning>,
) -> Option<NaiveDate> {
    let raw = value?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    warn!(task = task_id, field, value = raw, "unparseable date, using fallback placement");
    warnings.push(LayoutWarning::UnparseableDate {
        task_id: task_id.to_string(),
        field,
        value: raw.to_string(),
    });
    None
}
