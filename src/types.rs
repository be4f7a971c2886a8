//! Core data types for revin.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Identifier assigned to a task by the task store.
///
/// The reminders store numbers the incomplete tasks of a list from zero, so an
/// identifier is only meaningful relative to one listing.
pub type TaskId = u64;

/// A single task as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier, or a synthetic one for lines added in the buffer
    pub id: TaskId,

    /// Single-line task text
    pub content: String,

    /// Marked as completed in the edited buffer
    pub is_completed: bool,
}

impl Task {
    /// Create an incomplete task.
    pub fn new(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            is_completed: false,
        }
    }

    /// Create a task carrying the completion marker.
    pub fn completed(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            is_completed: true,
            ..Self::new(id, content)
        }
    }
}

/// Errors for an edited buffer that cannot be reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidFileError {
    /// The same identifier appears on two lines.
    DuplicateId(TaskId),
    /// An identifier larger than any the store handed out.
    UnknownId { id: TaskId, max_known: Option<TaskId> },
    /// An identifier too long to be any id the store handed out.
    IdOutOfRange(String),
    /// No identifier is left for another new line.
    IdsExhausted,
    /// A completion marker on a task that does not exist in the store yet.
    CompletedNewTask(TaskId),
}

impl std::fmt::Display for InvalidFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidFileError::DuplicateId(id) => write!(f, "duplicate task id {}", id),
            InvalidFileError::UnknownId { id, max_known } => match max_known {
                Some(max) => write!(
                    f,
                    "unknown task id {} (largest known id is {}); do not include an id when adding a task",
                    id, max
                ),
                None => write!(
                    f,
                    "unknown task id {} (the list was empty); do not include an id when adding a task",
                    id
                ),
            },
            InvalidFileError::IdOutOfRange(digits) => write!(
                f,
                "task id {} is out of range; do not include an id when adding a task",
                digits
            ),
            InvalidFileError::IdsExhausted => write!(f, "no task id left for a new task"),
            InvalidFileError::CompletedNewTask(id) => {
                write!(f, "task {} does not exist yet and cannot be completed", id)
            }
        }
    }
}

impl std::error::Error for InvalidFileError {}

/// The full state of one task list at one moment, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    tasks: BTreeMap<TaskId, Task>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot, rejecting duplicate identifiers.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, InvalidFileError> {
        let mut snapshot = Self::new();
        for task in tasks {
            snapshot.insert(task)?;
        }
        Ok(snapshot)
    }

    /// Insert a task. An existing entry is never overwritten.
    pub fn insert(&mut self, task: Task) -> Result<(), InvalidFileError> {
        match self.tasks.entry(task.id) {
            Entry::Occupied(_) => Err(InvalidFileError::DuplicateId(task.id)),
            Entry::Vacant(slot) => {
                slot.insert(task);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.keys().copied()
    }

    /// Tasks in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Largest identifier, or `None` for an empty snapshot.
    pub fn max_id(&self) -> Option<TaskId> {
        self.tasks.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(Task::new(1, "buy milk")).unwrap();

        let result = snapshot.insert(Task::new(1, "call mom"));
        assert_eq!(result, Err(InvalidFileError::DuplicateId(1)));

        // Original entry must survive
        assert_eq!(snapshot.get(1).unwrap().content, "buy milk");
    }

    #[test]
    fn test_from_tasks_duplicate() {
        let result = Snapshot::from_tasks([Task::new(0, "a"), Task::new(0, "b")]);
        assert_eq!(result, Err(InvalidFileError::DuplicateId(0)));
    }

    #[test]
    fn test_max_id() {
        assert_eq!(Snapshot::new().max_id(), None);

        let snapshot = Snapshot::from_tasks([Task::new(3, "c"), Task::new(0, "a"), Task::new(7, "z")]).unwrap();
        assert_eq!(snapshot.max_id(), Some(7));
        assert_eq!(snapshot.ids().collect::<Vec<_>>(), vec![0, 3, 7]);
    }

    #[test]
    fn test_completed_constructor() {
        let task = Task::completed(2, "call mom");
        assert!(task.is_completed);
        assert_eq!(task.content, "call mom");
    }

    #[test]
    fn test_unknown_id_message() {
        let err = InvalidFileError::UnknownId { id: 9, max_known: Some(4) };
        assert!(err.to_string().contains("unknown task id 9"));
        assert!(err.to_string().contains("largest known id is 4"));

        let err = InvalidFileError::UnknownId { id: 0, max_known: None };
        assert!(err.to_string().contains("list was empty"));

        let err = InvalidFileError::IdOutOfRange("123456789012345678901".to_string());
        assert!(err.to_string().contains("task id 123456789012345678901 is out of range"));
    }
}
