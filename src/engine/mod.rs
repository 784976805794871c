//! The layout and viewport-interaction engine.
//!
//! Everything here is pure and synchronous: a task snapshot goes in, a
//! [`Layout`] comes out, and no function suspends, blocks or panics on
//! malformed data. The rendering shell consumes the output and owns a
//! separate [`viewport::Viewport`] per view for pan/zoom.

pub mod blockers;
pub mod config;
pub mod graph;
pub mod grid;
pub mod lanes;
pub mod viewport;
pub mod warnings;

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::warn;

use crate::model::{GroupBy, Task};

use self::config::LayoutConfig;
use self::graph::{DependencyEdge, DependencyGraphIndex};
use self::grid::{DateGrid, TaskRect, TaskSpan};
use self::lanes::LaneMap;
use self::warnings::LayoutWarning;

/// One task with its derived placement for this layout pass.
#[derive(Debug, Clone)]
pub struct PlacedTask {
    pub task: Task,
    pub span: TaskSpan,
    pub lane: usize,
    pub rect: TaskRect,
}

/// The full output of one layout pass, ready for a rendering layer.
#[derive(Debug)]
pub struct Layout {
    pub tasks: Vec<PlacedTask>,
    pub dependencies: Vec<DependencyEdge>,
    pub lane_count: usize,
    pub day0_offset: i64,
    pub grid_start_date: NaiveDate,
    pub grid: DateGrid,
    /// Content bounding box at scale 1.0, for fit-to-view.
    pub content_size: (f32, f32),
    pub warnings: Vec<LayoutWarning>,
}

/// Map a snapshot onto the day grid and lanes.
///
/// Duplicate ids are dropped after the first occurrence (and flagged), so
/// id-indexed maps stay unambiguous. The input is never mutated; the
/// viewport transform is deliberately not part of this result — it belongs
/// to the view and survives snapshot refreshes.
pub fn compute_layout(
    tasks: &[Task],
    today: NaiveDate,
    group_by: GroupBy,
    cfg: &LayoutConfig,
) -> Layout {
    let mut warnings = Vec::new();
    let deduped = dedupe(tasks, &mut warnings);

    let graph = DependencyGraphIndex::build(&deduped);
    let (spans, grid) = grid::map_tasks(&deduped, today, cfg, &mut warnings);
    let lane_map: LaneMap = lanes::assign_lanes(&deduped, &graph, group_by);

    let placed = deduped
        .iter()
        .zip(spans)
        .map(|(task, span)| {
            let lane = lane_map.lane_of(&task.id).unwrap_or(0);
            PlacedTask {
                rect: grid.rect(span, lane),
                task: task.clone(),
                span,
                lane,
            }
        })
        .collect();

    let content_size = grid.content_size(lane_map.lane_count);
    Layout {
        tasks: placed,
        dependencies: graph.edges().to_vec(),
        lane_count: lane_map.lane_count,
        day0_offset: grid.day0_offset,
        grid_start_date: grid.grid_start_date,
        grid,
        content_size,
        warnings,
    }
}

fn dedupe(tasks: &[Task], warnings: &mut Vec<LayoutWarning>) -> Vec<Task> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(tasks.len());
    for task in tasks {
        if seen.insert(task.id.as_str()) {
            out.push(task.clone());
        } else {
            warn!(task = %task.id, "duplicate task id, keeping the first occurrence");
            warnings.push(LayoutWarning::DuplicateTaskId {
                task_id: task.id.clone(),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn duplicate_ids_are_flagged_and_first_wins() {
        let mut a = Task::new("a", "first", "alice");
        a.start = NaiveDate::from_ymd_opt(2026, 8, 25);
        a.due = NaiveDate::from_ymd_opt(2026, 8, 26);
        let b = Task::new("a", "second", "bob");
        let layout = compute_layout(&[a, b], today(), GroupBy::Owner, &LayoutConfig::default());
        assert_eq!(layout.tasks.len(), 1);
        assert_eq!(layout.tasks[0].task.name, "first");
        assert_eq!(
            layout.warnings,
            vec![LayoutWarning::DuplicateTaskId { task_id: "a".into() }]
        );
    }

    #[test]
    fn layout_carries_one_edge_per_parented_task() {
        let parent = Task::new("p", "p", "alice");
        let mut child = Task::new("c", "c", "alice");
        child.parent_id = Some("p".to_string());
        let layout =
            compute_layout(&[parent, child], today(), GroupBy::Owner, &LayoutConfig::default());
        assert_eq!(layout.dependencies.len(), 1);
        assert_eq!(layout.dependencies[0].from, "p");
        assert_eq!(layout.dependencies[0].to, "c");
    }

    #[test]
    fn empty_snapshot_still_yields_a_grid() {
        let layout = compute_layout(&[], today(), GroupBy::Owner, &LayoutConfig::default());
        assert!(layout.tasks.is_empty());
        assert_eq!(layout.lane_count, 0);
        assert_eq!(layout.day0_offset, 7);
        assert!(layout.content_size.0 > 0.0);
    }
}
