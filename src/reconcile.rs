//! Reconciliation of an edited snapshot against the snapshot it was made from.
//!
//! [`diff`] classifies every identifier; [`Plan`] turns the classification into
//! store operations in the only order that keeps identifiers valid:
//! adds, then updates, then deletes and completions merged and processed from
//! the highest identifier down. The store renumbers everything below a
//! removed task, so a lower id must never be removed before a higher one.

use crate::types::{InvalidFileError, Snapshot, TaskId};
use std::collections::BTreeSet;

/// Identifiers grouped by how they changed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Present only in the new snapshot
    pub adding: BTreeSet<TaskId>,

    /// Present only in the old snapshot
    pub deleting: BTreeSet<TaskId>,

    /// Present in both with different content
    pub updating: BTreeSet<TaskId>,

    /// Marked completed in the new snapshot
    pub completing: BTreeSet<TaskId>,
}

impl Diff {
    /// True when no set has any member.
    pub fn is_empty(&self) -> bool {
        self.adding.is_empty() && self.deleting.is_empty() && self.updating.is_empty() && self.completing.is_empty()
    }
}

/// Compare two snapshots.
///
/// Changing only the completion flag does not count as an update.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Diff {
    let mut result = Diff::default();

    for task in new.iter() {
        match old.get(task.id) {
            None => {
                result.adding.insert(task.id);
            }
            Some(previous) if previous.content != task.content => {
                result.updating.insert(task.id);
            }
            Some(_) => {}
        }
        if task.is_completed {
            result.completing.insert(task.id);
        }
    }

    result.deleting = old.ids().filter(|id| !new.contains(*id)).collect();

    result
}

/// A single call against the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a task; the store picks its identifier.
    Add { content: String },
    /// Replace the content of an existing task.
    Update { id: TaskId, old: String, new: String },
    /// Remove a task.
    Delete { id: TaskId, content: String },
    /// Mark a task completed, removing it from the open listing.
    Complete { id: TaskId, content: String },
}

impl Operation {
    /// Store identifier this operation targets; adds have none yet.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Operation::Add { .. } => None,
            Operation::Update { id, .. } | Operation::Delete { id, .. } | Operation::Complete { id, .. } => Some(*id),
        }
    }

    /// Deletes and completions shift the ids of the tasks that remain.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Operation::Delete { .. } | Operation::Complete { .. })
    }
}

/// Operations in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    operations: Vec<Operation>,
}

impl Plan {
    /// Build the ordered operations for a computed diff.
    ///
    /// Completions of tasks that were already completed in `old` are dropped.
    /// Fails if a task that is being added also carries the completion marker.
    pub fn build(old: &Snapshot, new: &Snapshot, diff: &Diff) -> Result<Self, InvalidFileError> {
        if let Some(id) = diff.adding.intersection(&diff.completing).next() {
            return Err(InvalidFileError::CompletedNewTask(*id));
        }

        let mut operations = Vec::new();

        for task in diff.adding.iter().filter_map(|id| new.get(*id)) {
            operations.push(Operation::Add {
                content: task.content.clone(),
            });
        }

        for id in &diff.updating {
            if let (Some(before), Some(after)) = (old.get(*id), new.get(*id)) {
                operations.push(Operation::Update {
                    id: *id,
                    old: before.content.clone(),
                    new: after.content.clone(),
                });
            }
        }

        // A task is either missing from `new` (delete) or present and marked
        // (complete), never both, so the merged ids are distinct.
        let mut destructive: Vec<Operation> = Vec::new();
        for id in &diff.deleting {
            if let Some(task) = old.get(*id) {
                destructive.push(Operation::Delete {
                    id: *id,
                    content: task.content.clone(),
                });
            }
        }
        for id in &diff.completing {
            let already_completed = old.get(*id).is_some_and(|t| t.is_completed);
            if let (false, Some(task)) = (already_completed, new.get(*id)) {
                destructive.push(Operation::Complete {
                    id: *id,
                    content: task.content.clone(),
                });
            }
        }
        destructive.sort_by_key(|op| std::cmp::Reverse(op.task_id()));
        operations.extend(destructive);

        Ok(Self { operations })
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Count of operations that would add, update, delete, and complete.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        self.operations.iter().fold((0, 0, 0, 0), |(a, u, d, c), op| match op {
            Operation::Add { .. } => (a + 1, u, d, c),
            Operation::Update { .. } => (a, u + 1, d, c),
            Operation::Delete { .. } => (a, u, d + 1, c),
            Operation::Complete { .. } => (a, u, d, c + 1),
        })
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
