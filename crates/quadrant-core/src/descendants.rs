//! Transitive sub-task resolution over the parent-pointer hierarchy.
//!
//! The collection stores only `parent_id` links. Cascading operations need the
//! opposite direction, so walks go through a [`ChildIndex`] built once per
//! operation instead of rescanning the collection for every node.

use std::collections::{HashMap, HashSet};

use crate::models::{TaskCollection, TaskId};

/// Parent id → direct child ids.
pub struct ChildIndex<'a> {
    children: HashMap<&'a TaskId, Vec<&'a TaskId>>,
}

impl<'a> ChildIndex<'a> {
    /// Indexes every parent link of the collection.
    pub fn build(tasks: &'a TaskCollection) -> Self {
        let mut children: HashMap<&TaskId, Vec<&TaskId>> = HashMap::new();
        for task in tasks {
            if let Some(parent) = &task.parent_id {
                children.entry(parent).or_default().push(&task.id);
            }
        }
        Self { children }
    }

    /// Direct children of `id`.
    pub fn children(&self, id: &TaskId) -> &[&'a TaskId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every id transitively below `root`, excluding `root` itself.
    ///
    /// The walk keeps a visited set, so self-references and cycles in
    /// corrupted data terminate after at most one visit per task.
    pub fn descendants(&self, root: &TaskId) -> HashSet<TaskId> {
        let mut found: HashSet<TaskId> = HashSet::new();
        let mut visited: HashSet<&TaskId> = HashSet::from([root]);
        let mut pending: Vec<&TaskId> = self.children(root).to_vec();

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            found.insert(id.clone());
            pending.extend(self.children(id).iter().copied());
        }

        found
    }
}

/// Returns the descendant closure of `id` in `tasks`.
///
/// # Examples
///
/// ```rust
/// use quadrant_core::{descendants::descendants_of, models::{Task, TaskCollection}};
///
/// let parent = Task::new("Plan trip", None);
/// let child = Task::subtask_of(&parent, "Book flights");
/// let tasks = TaskCollection::new(vec![parent.clone(), child.clone()]);
///
/// let below = descendants_of(&parent.id, &tasks);
/// assert!(below.contains(&child.id));
/// assert!(descendants_of(&child.id, &tasks).is_empty());
/// ```
pub fn descendants_of(id: &TaskId, tasks: &TaskCollection) -> HashSet<TaskId> {
    ChildIndex::build(tasks).descendants(id)
}

/// Returns `id` together with its descendant closure.
pub fn subtree_of(id: &TaskId, tasks: &TaskCollection) -> HashSet<TaskId> {
    let mut ids = descendants_of(id, tasks);
    ids.insert(id.clone());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn task(id: &str, parent: Option<&str>) -> Task {
        let mut task = Task::new(id, None);
        task.id = TaskId::from(id);
        task.parent_id = parent.map(TaskId::from);
        task
    }

    fn ids(names: &[&str]) -> HashSet<TaskId> {
        names.iter().map(|name| TaskId::from(*name)).collect()
    }

    #[test]
    fn test_leaf_has_no_descendants() {
        let tasks = TaskCollection::new(vec![task("a", None), task("b", Some("a"))]);
        assert!(descendants_of(&TaskId::from("b"), &tasks).is_empty());
    }

    #[test]
    fn test_unknown_id_has_no_descendants() {
        let tasks = TaskCollection::new(vec![task("a", None)]);
        assert!(descendants_of(&TaskId::from("missing"), &tasks).is_empty());
    }

    #[test]
    fn test_deep_chain_excludes_self_and_siblings() {
        let tasks = TaskCollection::new(vec![
            task("root", None),
            task("sibling", None),
            task("a", Some("root")),
            task("b", Some("a")),
            task("c", Some("b")),
            task("a2", Some("root")),
            task("other", Some("sibling")),
        ]);

        assert_eq!(
            descendants_of(&TaskId::from("root"), &tasks),
            ids(&["a", "b", "c", "a2"])
        );
        assert_eq!(descendants_of(&TaskId::from("a"), &tasks), ids(&["b", "c"]));
    }

    #[test]
    fn test_long_chain_terminates() {
        let mut list = vec![task("n0", None)];
        for i in 1..2000 {
            list.push(task(&format!("n{i}"), Some(&format!("n{}", i - 1))));
        }
        let tasks = TaskCollection::new(list);
        assert_eq!(descendants_of(&TaskId::from("n0"), &tasks).len(), 1999);
    }

    #[test]
    fn test_cycles_terminate() {
        let tasks = TaskCollection::new(vec![
            task("self", Some("self")),
            task("x", Some("z")),
            task("y", Some("x")),
            task("z", Some("y")),
        ]);

        assert!(descendants_of(&TaskId::from("self"), &tasks).is_empty());
        assert_eq!(descendants_of(&TaskId::from("x"), &tasks), ids(&["y", "z"]));
    }

    #[test]
    fn test_subtree_includes_root() {
        let tasks = TaskCollection::new(vec![task("a", None), task("b", Some("a"))]);
        assert_eq!(subtree_of(&TaskId::from("a"), &tasks), ids(&["a", "b"]));
    }
}
