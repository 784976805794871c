use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use super::config::LayoutConfig;
use super::warnings::LayoutWarning;
use crate::model::Task;

/// Horizontal placement of one task, in whole days relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskSpan {
    /// Negative when the task starts in the past.
    pub start_day_offset: i64,
    /// Always >= 1.
    pub duration_days: i64,
}

/// A derived pixel rectangle. Recomputed every layout pass, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// The day-indexed grid for one layout pass: bounds, the "today" column and
/// the one formula that maps day indices to pixels.
#[derive(Debug, Clone)]
pub struct DateGrid {
    /// Smallest visible day offset (min task offset minus 2 days).
    pub min_offset: i64,
    /// Largest visible day offset (max task end plus 2 days).
    pub max_offset: i64,
    /// Grid column index of "today"; columns before it hold overdue tasks.
    pub day0_offset: i64,
    /// Calendar date of grid column 0.
    pub grid_start_date: NaiveDate,
    cfg: LayoutConfig,
}

/// Compute per-task day spans and the enclosing grid.
///
/// Total over any input. The only anomaly is a due date before the start
/// date, which clamps the duration to one day and records a warning; tasks
/// without any usable date get a stable index-based placement so layout
/// stays reproducible.
pub fn map_tasks(
    tasks: &[Task],
    today: NaiveDate,
    cfg: &LayoutConfig,
    warnings: &mut Vec<LayoutWarning>,
) -> (Vec<TaskSpan>, DateGrid) {
    let spans: Vec<TaskSpan> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| span_for(task, index, today, warnings))
        .collect();

    let (min_offset, max_offset) = if spans.is_empty() {
        (-7, 7)
    } else {
        let min = spans.iter().map(|s| s.start_day_offset).min().unwrap_or(0);
        let max = spans
            .iter()
            .map(|s| s.start_day_offset + s.duration_days)
            .max()
            .unwrap_or(0);
        (min - 2, max + 2)
    };

    let grid = DateGrid {
        min_offset,
        max_offset,
        day0_offset: -min_offset,
        grid_start_date: today + Duration::days(min_offset),
        cfg: cfg.clone(),
    };
    (spans, grid)
}

fn span_for(
    task: &Task,
    index: usize,
    today: NaiveDate,
    warnings: &mut Vec<LayoutWarning>,
) -> TaskSpan {
    match (task.start, task.due) {
        (Some(start), Some(due)) if due >= start => TaskSpan {
            start_day_offset: (start - today).num_days(),
            duration_days: (due - start).num_days() + 1,
        },
        (Some(start), Some(_)) => {
            // Due before start is upstream data rot, not a reason to fail
            // the whole layout.
            warn!(task = %task.id, "due date precedes start date, clamping duration to 1");
            warnings.push(LayoutWarning::DueBeforeStart {
                task_id: task.id.clone(),
            });
            TaskSpan {
                start_day_offset: (start - today).num_days(),
                duration_days: 1,
            }
        }
        (None, Some(due)) => TaskSpan {
            start_day_offset: (due - today).num_days(),
            duration_days: 1,
        },
        (Some(start), None) => TaskSpan {
            start_day_offset: (start - today).num_days(),
            duration_days: 1,
        },
        (None, None) => TaskSpan {
            start_day_offset: (index % 7) as i64,
            duration_days: 1,
        },
    }
}

impl DateGrid {
    /// Number of day columns in the grid.
    pub fn day_count(&self) -> i64 {
        self.max_offset - self.min_offset
    }

    /// X position of the grid line at `grid_index`. This is the single
    /// horizontal formula; `rect` goes through it too, which is what keeps
    /// bars aligned with their day columns.
    pub fn x_of_day(&self, grid_index: i64) -> f32 {
        self.cfg.left_label_area + self.cfg.padding + grid_index as f32 * self.cfg.day_width
    }

    /// Inverse of `x_of_day`: the (fractional) grid index under an x
    /// position in content space.
    pub fn day_at_x(&self, x: f32) -> f32 {
        (x - self.cfg.left_label_area - self.cfg.padding) / self.cfg.day_width
    }

    /// Pixel rectangle for a span in a given lane.
    pub fn rect(&self, span: TaskSpan, lane: usize) -> TaskRect {
        TaskRect {
            x: self.x_of_day(self.day0_offset + span.start_day_offset),
            y: self.cfg.padding
                + lane as f32 * self.cfg.lane_height
                + (self.cfg.lane_height - self.cfg.bar_height) / 2.0,
            w: (span.duration_days as f32 * self.cfg.day_width).max(self.cfg.min_bar_width),
            h: self.cfg.bar_height,
        }
    }

    /// Bounding size of the whole chart content at scale 1.0.
    pub fn content_size(&self, lane_count: usize) -> (f32, f32) {
        (
            self.cfg.left_label_area + 2.0 * self.cfg.padding + self.day_count() as f32 * self.cfg.day_width,
            2.0 * self.cfg.padding + lane_count as f32 * self.cfg.lane_height,
        )
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }
}
