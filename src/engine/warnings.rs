use thiserror::Error;

/// Non-fatal data-quality findings collected during snapshot ingestion and
/// layout. None of these abort a layout pass; the engine stays total and the
/// caller decides whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutWarning {
    #[error("task {task_id}: due date precedes start date, duration clamped to 1 day")]
    DueBeforeStart { task_id: String },

    #[error("task {task_id}: unparseable {field} date {value:?}, using fallback placement")]
    UnparseableDate {
        task_id: String,
        field: &'static str,
        value: String,
    },

    #[error("duplicate task id {task_id}, keeping the first occurrence")]
    DuplicateTaskId { task_id: String },

    #[error("task {task_id}: unknown status {value:?}")]
    UnknownStatus { task_id: String, value: String },

    #[error("task {task_id}: unknown priority {value:?}")]
    UnknownPriority { task_id: String, value: String },
}
