use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::model::Task;

/// One derived parent -> child edge, used for arrow drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

/// Id-indexed adjacency over the task forest.
///
/// Built fresh from each snapshot. Traversals never walk the task structs
/// themselves; everything goes through these maps with a visited set, so a
/// cyclic `parent_id` chain (which violates the forest invariant upstream)
/// terminates instead of hanging.
#[derive(Debug, Default)]
pub struct DependencyGraphIndex {
    children_of: HashMap<String, Vec<String>>,
    parent_of: HashMap<String, String>,
    ids: HashSet<String>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraphIndex {
    /// Index a snapshot. On duplicate ids the first occurrence wins; the
    /// caller is expected to have already flagged duplicates.
    pub fn build(tasks: &[Task]) -> Self {
        let mut index = Self::default();
        for task in tasks {
            if !index.ids.insert(task.id.clone()) {
                continue;
            }
            let Some(parent) = &task.parent_id else { continue };
            index.parent_of.insert(task.id.clone(), parent.clone());
            index
                .children_of
                .entry(parent.clone())
                .or_default()
                .push(task.id.clone());
            index.edges.push(DependencyEdge {
                from: parent.clone(),
                to: task.id.clone(),
            });
        }
        index
    }

    /// Whether the id appears in the indexed snapshot.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parent_of.get(id).map(String::as_str)
    }

    /// Direct children, in snapshot order. O(1).
    pub fn children(&self, id: &str) -> &[String] {
        self.children_of.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parent -> child edges, one per task with a parent, in snapshot order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// All ancestors, nearest first. Terminates on cyclic input.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        let mut out = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if !visited.insert(parent.to_string()) {
                break;
            }
            out.push(parent.to_string());
            current = parent;
        }
        out
    }

    /// All descendants, breadth-first. Terminates on cyclic input.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        let mut out = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            for child in self.children(current) {
                if visited.insert(child.clone()) {
                    out.push(child.clone());
                    queue.push_back(child);
                }
            }
        }
        out
    }

    /// The task itself plus all ancestors and all descendants; drives the
    /// dependency-impact highlight on selection.
    pub fn blast_radius(&self, id: &str) -> HashSet<String> {
        let mut out: HashSet<String> = HashSet::new();
        out.insert(id.to_string());
        out.extend(self.ancestors(id));
        out.extend(self.descendants(id));
        out
    }

    /// True when walking the parent chain from `id` revisits a node, i.e.
    /// the task sits in or below a parent cycle.
    pub fn has_cyclic_ancestry(&self, id: &str) -> bool {
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if !visited.insert(parent) {
                return true;
            }
            current = parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn child_of(id: &str, parent: &str) -> Task {
        let mut t = Task::new(id, id, "alice");
        t.parent_id = Some(parent.to_string());
        t
    }

    fn forest() -> Vec<Task> {
        vec![
            Task::new("root", "root", "alice"),
            child_of("a", "root"),
            child_of("b", "root"),
            child_of("a1", "a"),
        ]
    }

    #[test]
    fn children_preserve_snapshot_order() {
        let index = DependencyGraphIndex::build(&forest());
        assert_eq!(index.children("root"), ["a".to_string(), "b".to_string()]);
        assert_eq!(index.children("b"), Vec::<String>::new().as_slice());
    }

    #[test]
    fn ancestors_walk_to_the_root() {
        let index = DependencyGraphIndex::build(&forest());
        assert_eq!(index.ancestors("a1"), vec!["a".to_string(), "root".to_string()]);
        assert!(index.ancestors("root").is_empty());
    }

    #[test]
    fn blast_radius_of_isolated_task_is_itself() {
        let tasks = vec![Task::new("solo", "solo", "alice")];
        let index = DependencyGraphIndex::build(&tasks);
        let radius = index.blast_radius("solo");
        assert_eq!(radius.len(), 1);
        assert!(radius.contains("solo"));
    }

    #[test]
    fn blast_radius_spans_both_directions() {
        let index = DependencyGraphIndex::build(&forest());
        let radius = index.blast_radius("a");
        assert!(radius.contains("root"));
        assert!(radius.contains("a"));
        assert!(radius.contains("a1"));
        assert!(!radius.contains("b"));
    }

    #[test]
    fn cyclic_parent_chain_terminates() {
        let tasks = vec![child_of("x", "y"), child_of("y", "x"), child_of("z", "x")];
        let index = DependencyGraphIndex::build(&tasks);
        // Must return, not hang.
        let up = index.ancestors("z");
        assert_eq!(up, vec!["x".to_string(), "y".to_string()]);
        let down = index.descendants("x");
        assert!(down.contains(&"z".to_string()));
        assert!(index.has_cyclic_ancestry("x"));
        assert!(index.has_cyclic_ancestry("z"));
    }

    #[test]
    fn duplicate_ids_keep_first_parent() {
        let mut dup = child_of("a", "other");
        dup.name = "imposter".to_string();
        let mut tasks = forest();
        tasks.push(dup);
        let index = DependencyGraphIndex::build(&tasks);
        assert_eq!(index.parent("a"), Some("root"));
        assert_eq!(index.children("other"), Vec::<String>::new().as_slice());
    }

    #[test]
    fn edges_one_per_parented_task() {
        let index = DependencyGraphIndex::build(&forest());
        assert_eq!(index.edges().len(), 3);
        assert_eq!(
            index.edges()[0],
            DependencyEdge { from: "root".into(), to: "a".into() }
        );
    }
}
