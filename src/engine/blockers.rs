use chrono::{DateTime, Utc};
use serde::Serialize;

use super::graph::DependencyGraphIndex;
use crate::model::{Task, TaskStatus};

/// One blocked child of a selected task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    pub blocker_id: String,
    pub owner_key: String,
    /// When the child was last updated, or `now` when that's unrecorded.
    pub since: DateTime<Utc>,
}

/// Direct children of `task_id` whose status is blocked.
///
/// Recomputed per call, no cache: at this scale recomputation is cheaper
/// than keeping a cache correct under snapshot churn. The linear child
/// lookup is fine for tens to low hundreds of tasks.
pub fn blockers_of(
    task_id: &str,
    graph: &DependencyGraphIndex,
    tasks: &[Task],
    now: DateTime<Utc>,
) -> Vec<Blocker> {
    graph
        .children(task_id)
        .iter()
        .filter_map(|child_id| tasks.iter().find(|t| &t.id == child_id))
        .filter(|child| child.status == TaskStatus::Blocked)
        .map(|child| Blocker {
            blocker_id: child.id.clone(),
            owner_key: child.owner_key.clone(),
            since: child.updated_at.unwrap_or(now),
        })
        .collect()
}

/// Roll a set of child statuses up into one parent status: blocked beats
/// in-progress beats todo; an empty set settles on in-progress. Total,
/// never panics.
pub fn aggregate_status<I>(children: I) -> TaskStatus
where
    I: IntoIterator<Item = TaskStatus>,
{
    let mut any_in_progress = false;
    let mut any_todo = false;
    for status in children {
        match status {
            TaskStatus::Blocked => return TaskStatus::Blocked,
            TaskStatus::InProgress => any_in_progress = true,
            TaskStatus::Todo => any_todo = true,
        }
    }
    if any_in_progress {
        TaskStatus::InProgress
    } else if any_todo {
        TaskStatus::Todo
    } else {
        TaskStatus::InProgress
    }
}

/// Optional status propagation: bubble aggregate statuses up to every task
/// that has children, returning a new snapshot (input is never mutated).
///
/// The settling loop is capped at the task count, so it terminates even
/// when the parent graph is cyclic or otherwise malformed.
pub fn propagate_statuses(tasks: &[Task], graph: &DependencyGraphIndex) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.to_vec();
    let cap = out.len();
    for _ in 0..cap {
        let mut changed = false;
        for i in 0..out.len() {
            let children = graph.children(&out[i].id);
            if children.is_empty() {
                continue;
            }
            let rolled = aggregate_status(
                children
                    .iter()
                    .filter_map(|id| out.iter().find(|t| &t.id == id))
                    .map(|t| t.status),
            );
            if out[i].status != rolled {
                out[i].status = rolled;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn child(id: &str, parent: &str, status: TaskStatus) -> Task {
        let mut t = Task::new(id, id, "bob");
        t.parent_id = Some(parent.to_string());
        t.status = status;
        t
    }

    #[test]
    fn blocked_child_is_reported_with_owner_and_since() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let parent = Task::new("P", "Parent", "alice");
        let mut blocked = child("C", "P", TaskStatus::Blocked);
        blocked.updated_at = Some(Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0).unwrap());
        let unblocked = child("D", "P", TaskStatus::InProgress);
        let tasks = vec![parent, blocked, unblocked];
        let graph = DependencyGraphIndex::build(&tasks);

        let blockers = blockers_of("P", &graph, &tasks, now);
        assert_eq!(blockers.len(), 1);
        assert_eq!(blockers[0].blocker_id, "C");
        assert_eq!(blockers[0].owner_key, "bob");
        assert_eq!(
            blockers[0].since,
            Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn since_falls_back_to_now_without_update_time() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let tasks = vec![
            Task::new("P", "Parent", "alice"),
            child("C", "P", TaskStatus::Blocked),
        ];
        let graph = DependencyGraphIndex::build(&tasks);
        let blockers = blockers_of("P", &graph, &tasks, now);
        assert_eq!(blockers[0].since, now);
    }

    #[test]
    fn only_direct_children_count() {
        let tasks = vec![
            Task::new("P", "Parent", "alice"),
            child("C", "P", TaskStatus::Todo),
            child("G", "C", TaskStatus::Blocked),
        ];
        let graph = DependencyGraphIndex::build(&tasks);
        let now = Utc::now();
        assert!(blockers_of("P", &graph, &tasks, now).is_empty());
        assert_eq!(blockers_of("C", &graph, &tasks, now).len(), 1);
    }

    #[test]
    fn aggregate_prefers_blocked_then_in_progress_then_todo() {
        use TaskStatus::*;
        assert_eq!(aggregate_status([Todo, Blocked, InProgress]), Blocked);
        assert_eq!(aggregate_status([Todo, InProgress]), InProgress);
        assert_eq!(aggregate_status([Todo, Todo]), Todo);
        assert_eq!(aggregate_status(std::iter::empty::<TaskStatus>()), InProgress);
    }

    #[test]
    fn propagation_bubbles_through_two_levels() {
        let mut root = Task::new("R", "Root", "alice");
        root.status = TaskStatus::Todo;
        let tasks = vec![
            root,
            child("M", "R", TaskStatus::Todo),
            child("L", "M", TaskStatus::Blocked),
        ];
        let graph = DependencyGraphIndex::build(&tasks);
        let settled = propagate_statuses(&tasks, &graph);
        let status_of = |id: &str| settled.iter().find(|t| t.id == id).map(|t| t.status);
        assert_eq!(status_of("M"), Some(TaskStatus::Blocked));
        assert_eq!(status_of("R"), Some(TaskStatus::Blocked));
        assert_eq!(status_of("L"), Some(TaskStatus::Blocked));
        // Input untouched.
        assert_eq!(tasks[0].status, TaskStatus::Todo);
    }

    #[test]
    fn propagation_terminates_on_cyclic_parents() {
        let tasks = vec![
            child("x", "y", TaskStatus::Blocked),
            child("y", "x", TaskStatus::Todo),
        ];
        let graph = DependencyGraphIndex::build(&tasks);
        let settled = propagate_statuses(&tasks, &graph);
        assert_eq!(settled.len(), 2);
    }
}
