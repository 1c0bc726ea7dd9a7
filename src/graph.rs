//! Dependency graph and registration-time cycle detection.
//!
//! Edges point from a task to the tasks it depends on. One entry is inserted per registered
//! task, and [`DependencyGraph::insert`] refuses any entry that would close a cycle, so the
//! graph is acyclic at all times and execution never has to check for cycles.
//!
//! # Why seeding the search at the new task is enough
//!
//! Before an insertion the graph is acyclic, and the insertion only adds outgoing edges to the
//! new task. Any cycle that appears afterwards must therefore pass through the new task, and a
//! depth-first search starting there will find it.
//!
//! This still holds when handles were issued for ids that had no task yet. Earlier tasks may
//! already have edges pointing at the new id; when the new task's own edges lead back to one of
//! them, the search walks from the new task through those earlier edges and meets the new task
//! again on its current path.
//!
//! The search is skipped entirely when no entry lists the new id as a dependency and the new
//! task does not list itself: nothing can lead back to it, so no cycle can pass through it.
//! Appending to a chain therefore costs time proportional to the new task's own edges.

use std::collections::{HashMap, HashSet};

use crate::types::TaskId;

/// Mapping from task id to the set of task ids it depends on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct DependencyGraph {
    edges: HashMap<TaskId, HashSet<TaskId>>,
    /// Number of entries that list each id as a dependency. Ids with no dependents are absent.
    dependents: HashMap<TaskId, usize>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `dependencies` for `id`, unless doing so would close a cycle.
    ///
    /// On a cycle the entry is rolled back, the graph is left exactly as it was, and the cycle
    /// is returned as the path of ids from `id` back to `id`.
    pub(crate) fn insert(
        &mut self,
        id: TaskId,
        dependencies: HashSet<TaskId>,
    ) -> Result<(), Vec<TaskId>> {
        let reachable = dependencies.contains(&id) || self.dependents.contains_key(&id);

        self.link(&dependencies);
        let previous = self.edges.insert(id, dependencies);
        if let Some(previous) = &previous {
            self.unlink(previous);
        }

        if !reachable {
            return Ok(());
        }

        if let Some(cycle) = self.find_cycle_from(id) {
            let rejected = match previous {
                Some(previous) => {
                    self.link(&previous);
                    self.edges.insert(id, previous)
                }
                None => self.edges.remove(&id),
            };
            if let Some(rejected) = rejected {
                self.unlink(&rejected);
            }
            return Err(cycle);
        }

        Ok(())
    }

    fn link(&mut self, dependencies: &HashSet<TaskId>) {
        for &dep in dependencies {
            *self.dependents.entry(dep).or_insert(0) += 1;
        }
    }

    fn unlink(&mut self, dependencies: &HashSet<TaskId>) {
        for dep in dependencies {
            if let Some(count) = self.dependents.get_mut(dep) {
                *count -= 1;
                if *count == 0 {
                    self.dependents.remove(dep);
                }
            }
        }
    }

    /// Depth-first search from `start` for a path that returns to a node on the current path.
    ///
    /// Uses an explicit stack so long dependency chains cannot overflow the call stack.
    /// Ids without an entry have no outgoing edges.
    pub(crate) fn find_cycle_from(&self, start: TaskId) -> Option<Vec<TaskId>> {
        let mut visited: HashSet<TaskId> = HashSet::new();
        let mut on_path: HashSet<TaskId> = HashSet::new();
        let mut path: Vec<TaskId> = Vec::new();
        // Each frame holds a node and the dependencies of it still to explore
        let mut stack: Vec<(TaskId, Vec<TaskId>)> = Vec::new();

        visited.insert(start);
        on_path.insert(start);
        path.push(start);
        stack.push((start, self.sorted_dependencies(start)));

        while let Some((_, pending)) = stack.last_mut() {
            match pending.pop() {
                Some(next) if on_path.contains(&next) => {
                    // Back-edge: the cycle is the tail of the path starting at `next`
                    let begin = path.iter().position(|&id| id == next).unwrap_or(0);
                    let mut cycle = path[begin..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Some(next) if visited.contains(&next) => {}
                Some(next) => {
                    visited.insert(next);
                    on_path.insert(next);
                    path.push(next);
                    stack.push((next, self.sorted_dependencies(next)));
                }
                None => {
                    if let Some((done, _)) = stack.pop() {
                        on_path.remove(&done);
                        path.pop();
                    }
                }
            }
        }

        None
    }

    /// Whether the whole graph is free of cycles.
    #[cfg(test)]
    pub(crate) fn is_acyclic(&self) -> bool {
        let mut ids: Vec<TaskId> = self.edges.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().all(|id| self.find_cycle_from(id).is_none())
    }

    pub(crate) fn dependencies(&self, id: TaskId) -> Option<&HashSet<TaskId>> {
        self.edges.get(&id)
    }

    /// Dependencies of `id` in descending order, so popping yields them ascending.
    fn sorted_dependencies(&self, id: TaskId) -> Vec<TaskId> {
        let mut deps: Vec<TaskId> = self
            .edges
            .get(&id)
            .map(|deps| deps.iter().copied().collect())
            .unwrap_or_default();
        deps.sort_unstable_by(|a, b| b.cmp(a));
        deps
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.values().map(HashSet::len).sum()
    }
}
