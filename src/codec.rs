//! Conversion between task snapshots and the editable tab-separated buffer.
//!
//! Each task occupies one line: `<id>\t<content>`. On the way back in, a line
//! whose id is prefixed with [`COMPLETION_SIGIL`] marks that task completed, and
//! a line without an id is a new task.

use crate::types::{InvalidFileError, Snapshot, Task, TaskId};
use regex::Regex;
use std::sync::LazyLock;

/// Prefix on an id field that marks the task as completed.
pub const COMPLETION_SIGIL: char = 'X';

/// Synthetic ids for new lines start right above this value.
pub const SYNTHETIC_ID_BASE: TaskId = 999_999;

static PLAIN_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("regex"));
static COMPLETED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{}([0-9]+)$", COMPLETION_SIGIL)).expect("regex"));

/// Render tasks as a buffer, one `<id>\t<content>` line each.
///
/// Completion state is not written out. Embedded newlines are folded into
/// spaces so every task stays on exactly one line.
pub fn encode<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    let mut buffer = String::new();
    for task in tasks {
        buffer.push_str(&task.id.to_string());
        buffer.push('\t');
        buffer.push_str(&fold_lines(&task.content));
        buffer.push('\n');
    }
    buffer
}

fn fold_lines(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First synthetic id handed out when decoding against `max_known`.
///
/// `None` when `max_known` leaves no room above it.
pub fn first_synthetic_id(max_known: Option<TaskId>) -> Option<TaskId> {
    max_known
        .map_or(SYNTHETIC_ID_BASE, |max| max.max(SYNTHETIC_ID_BASE))
        .checked_add(1)
}

/// Parse an edited buffer back into a snapshot.
///
/// `max_known` is the largest id present when the buffer was captured; any
/// user-supplied id above it was made up and is rejected.
pub fn decode(buffer: &str, max_known: Option<TaskId>) -> Result<Snapshot, InvalidFileError> {
    let mut snapshot = Snapshot::new();
    let mut next_synthetic = first_synthetic_id(max_known);
    let mut synthetic = |content: &str| {
        let id = next_synthetic.ok_or(InvalidFileError::IdsExhausted)?;
        next_synthetic = id.checked_add(1);
        Ok::<_, InvalidFileError>(Task::new(id, content))
    };

    for line in buffer.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let task = match line.split_once('\t') {
            None => synthetic(line.trim())?,
            Some((field, content)) => {
                if PLAIN_ID.is_match(field) {
                    Task::new(checked_id(field, max_known)?, content.trim())
                } else if let Some(caps) = COMPLETED_ID.captures(field) {
                    Task::completed(checked_id(&caps[1], max_known)?, content.trim())
                } else {
                    synthetic(line.trim())?
                }
            }
        };

        snapshot.insert(task)?;
    }

    Ok(snapshot)
}

fn checked_id(digits: &str, max_known: Option<TaskId>) -> Result<TaskId, InvalidFileError> {
    // Digits too long for u64 are certainly beyond anything the store issued.
    let Ok(id) = digits.parse::<TaskId>() else {
        return Err(InvalidFileError::IdOutOfRange(digits.to_string()));
    };
    match max_known {
        Some(max) if id <= max => Ok(id),
        _ => Err(InvalidFileError::UnknownId { id, max_known }),
    }
}
