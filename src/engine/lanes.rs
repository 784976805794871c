use std::collections::{BTreeMap, HashMap, HashSet};

use super::graph::DependencyGraphIndex;
use crate::model::{GroupBy, Task};

/// Task -> lane assignment for one snapshot and grouping key. Recomputed
/// from scratch on every relevant change; at tens to low hundreds of tasks
/// an incremental path is not worth its invalidation bugs.
#[derive(Debug, Clone, Default)]
pub struct LaneMap {
    lanes: HashMap<String, usize>,
    /// `1 + max(assigned index)`, so trailing spacers don't pad the chart.
    pub lane_count: usize,
}

impl LaneMap {
    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.lanes.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Assign every task a lane.
///
/// Groups are ordered lexicographically by their value. Within a group,
/// roots keep their snapshot-relative order; each already-laned member's
/// children follow directly after, with one blank spacer lane after a parent
/// that actually had children, and one spacer between groups (none after the
/// last).
///
/// A member counts as a root when it has no parent, its parent is absent
/// from the dataset, its parent landed in a different group, or its ancestor
/// chain revisits itself. The last two rules guarantee every member gets a
/// lane and that assignment terminates on cyclic input.
pub fn assign_lanes(tasks: &[Task], graph: &DependencyGraphIndex, key: GroupBy) -> LaneMap {
    let mut groups: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.group_value(key)).or_default().push(task);
    }

    let mut lanes: HashMap<String, usize> = HashMap::new();
    let mut next_lane = 0usize;
    let mut max_assigned: Option<usize> = None;

    let group_total = groups.len();
    for (group_index, (_value, members)) in groups.into_iter().enumerate() {
        let member_ids: HashSet<&str> = members.iter().map(|t| t.id.as_str()).collect();
        let mut by_parent: HashMap<&str, Vec<&Task>> = HashMap::new();
        let mut order: Vec<&Task> = Vec::new();

        for &task in &members {
            let treat_as_root = match &task.parent_id {
                None => true,
                Some(parent) => {
                    !member_ids.contains(parent.as_str()) || graph.has_cyclic_ancestry(&task.id)
                }
            };
            if treat_as_root {
                assign(&mut lanes, task, &mut next_lane, &mut max_assigned);
                order.push(task);
            } else if let Some(parent) = &task.parent_id {
                by_parent.entry(parent.as_str()).or_default().push(task);
            }
        }

        // Parents are visited in the order their lanes were assigned;
        // children extend that order, so grandchildren get placed too.
        let mut cursor = 0;
        while cursor < order.len() {
            let parent: &Task = order[cursor];
            if let Some(children) = by_parent.remove(parent.id.as_str()) {
                let had_children = !children.is_empty();
                for child in children {
                    assign(&mut lanes, child, &mut next_lane, &mut max_assigned);
                    order.push(child);
                }
                if had_children {
                    next_lane += 1; // spacer below this parent's children
                }
            }
            cursor += 1;
        }

        // Anything still unassigned can only mean pathological input (e.g.
        // a parent cycle the root rules missed). Flush deterministically in
        // member order rather than dropping tasks.
        for &task in &members {
            if !lanes.contains_key(&task.id) {
                assign(&mut lanes, task, &mut next_lane, &mut max_assigned);
            }
        }

        if group_index + 1 < group_total {
            next_lane += 1; // spacer between groups
        }
    }

    LaneMap {
        lanes,
        lane_count: max_assigned.map_or(0, |m| m + 1),
    }
}

fn assign(
    lanes: &mut HashMap<String, usize>,
    task: &Task,
    next_lane: &mut usize,
    max_assigned: &mut Option<usize>,
) {
    lanes.entry(task.id.clone()).or_insert(*next_lane);
    *max_assigned = Some(max_assigned.map_or(*next_lane, |m| m.max(*next_lane)));
    *next_lane += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, TaskStatus};

    fn owned(id: &str, owner: &str) -> Task {
        Task::new(id, id, owner)
    }

    fn child(id: &str, owner: &str, parent: &str) -> Task {
        let mut t = owned(id, owner);
        t.parent_id = Some(parent.to_string());
        t
    }

    fn lanes_for(tasks: &[Task], key: GroupBy) -> LaneMap {
        let graph = DependencyGraphIndex::build(tasks);
        assign_lanes(tasks, &graph, key)
    }

    #[test]
    fn empty_snapshot_has_zero_lanes() {
        let map = lanes_for(&[], GroupBy::Owner);
        assert_eq!(map.lane_count, 0);
        assert!(map.is_empty());
    }

    #[test]
    fn roots_keep_snapshot_order_within_a_group() {
        let tasks = vec![owned("b", "alice"), owned("a", "alice"), owned("c", "alice")];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.lane_of("b"), Some(0));
        assert_eq!(map.lane_of("a"), Some(1));
        assert_eq!(map.lane_of("c"), Some(2));
        assert_eq!(map.lane_count, 3);
    }

    #[test]
    fn children_follow_with_a_spacer_after_each_parent() {
        let tasks = vec![
            owned("p1", "alice"),
            owned("p2", "alice"),
            child("c1", "alice", "p1"),
            child("c2", "alice", "p1"),
            child("c3", "alice", "p2"),
        ];
        let map = lanes_for(&tasks, GroupBy::Owner);
        // Roots first, then p1's children + spacer, then p2's child + spacer.
        assert_eq!(map.lane_of("p1"), Some(0));
        assert_eq!(map.lane_of("p2"), Some(1));
        assert_eq!(map.lane_of("c1"), Some(2));
        assert_eq!(map.lane_of("c2"), Some(3));
        assert_eq!(map.lane_of("c3"), Some(5));
        assert_eq!(map.lane_count, 6);
    }

    #[test]
    fn childless_parent_gets_no_spacer() {
        let tasks = vec![owned("p1", "alice"), owned("p2", "alice")];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.lane_count, 2);
    }

    #[test]
    fn groups_are_sorted_and_separated_by_one_spacer() {
        let tasks = vec![owned("z", "zoe"), owned("a", "amy")];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.lane_of("a"), Some(0));
        assert_eq!(map.lane_of("z"), Some(2));
        assert_eq!(map.lane_count, 3);
    }

    #[test]
    fn spacer_total_matches_groups_plus_fertile_parents() {
        // 2 groups, 2 parents with children => spacers = (2-1) + 2 = 3.
        let tasks = vec![
            owned("p1", "amy"),
            child("c1", "amy", "p1"),
            owned("p2", "zoe"),
            child("c2", "zoe", "p2"),
        ];
        let map = lanes_for(&tasks, GroupBy::Owner);
        let assigned: usize = tasks.len();
        let highest = map.lane_of("c2").unwrap();
        // amy: p1=0, c1=1, spacer=2; group spacer=3; zoe: p2=4, c2=5.
        assert_eq!(highest + 1 - assigned, 2); // spacers below the top lane
        assert_eq!(map.lane_of("p2"), Some(4));
        assert_eq!(map.lane_count, 6);
    }

    #[test]
    fn orphaned_child_is_treated_as_root() {
        let tasks = vec![child("c", "alice", "ghost")];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.lane_of("c"), Some(0));
        assert_eq!(map.lane_count, 1);
    }

    #[test]
    fn child_in_another_group_becomes_root_of_its_group() {
        let tasks = vec![owned("p", "alice"), child("c", "bob", "p")];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.lane_of("p"), Some(0));
        // Group spacer after alice, then bob's root.
        assert_eq!(map.lane_of("c"), Some(2));
    }

    #[test]
    fn cyclic_parents_terminate_as_roots() {
        let tasks = vec![child("x", "alice", "y"), child("y", "alice", "x")];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.len(), 2);
        assert_eq!(map.lane_of("x"), Some(0));
        assert_eq!(map.lane_of("y"), Some(1));
    }

    #[test]
    fn grouping_by_status_uses_status_labels() {
        let mut blocked = owned("b", "alice");
        blocked.status = TaskStatus::Blocked;
        let todo = owned("t", "alice");
        let tasks = vec![todo, blocked];
        let map = lanes_for(&tasks, GroupBy::Status);
        // "blocked" < "todo" lexicographically.
        assert_eq!(map.lane_of("b"), Some(0));
        assert_eq!(map.lane_of("t"), Some(2));
    }

    #[test]
    fn grandchildren_are_laned_after_their_parent_is_processed() {
        let tasks = vec![
            owned("p", "alice"),
            child("c", "alice", "p"),
            child("g", "alice", "c"),
        ];
        let map = lanes_for(&tasks, GroupBy::Owner);
        assert_eq!(map.lane_of("p"), Some(0));
        assert_eq!(map.lane_of("c"), Some(1));
        // Spacer after p's children, then c's child g, then its spacer.
        assert_eq!(map.lane_of("g"), Some(3));
        assert_eq!(map.lane_count, 4);
    }
}
