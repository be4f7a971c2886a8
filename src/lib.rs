//! Revin: bulk-edit a reminders list in a text editor.
//!
//! The list is written to a buffer with one `<id>\t<content>` line per task.
//! After the user edits it, the buffer is parsed back, compared against the
//! list as it was, and the differences are sent to the store as adds,
//! updates, deletes, and completions.
//!
//! # Example
//!
//! ```
//! use revin::{Plan, Snapshot, Task, decode, diff};
//!
//! let old = Snapshot::from_tasks([Task::new(0, "buy milk"), Task::new(1, "call mom")]).unwrap();
//! let new = decode("X1\tcall mom\nwalk dog\n", old.max_id()).unwrap();
//!
//! let changes = diff(&old, &new);
//! assert_eq!(changes.deleting.len(), 1);
//! assert_eq!(changes.completing.len(), 1);
//! assert_eq!(changes.adding.len(), 1);
//!
//! let plan = Plan::build(&old, &new, &changes).unwrap();
//! assert_eq!(plan.len(), 3);
//! ```

mod codec;
mod reconcile;
mod types;

pub mod config;
pub mod editor;
pub mod palette;
pub mod session;
pub mod store;
pub mod workspace;

// Re-export public API
pub use codec::{COMPLETION_SIGIL, SYNTHETIC_ID_BASE, decode, encode, first_synthetic_id};
pub use config::{Config, ConfigFile, ConfigOverrides};
pub use editor::{Editor, ExternalEditor};
pub use palette::Palette;
pub use reconcile::{Diff, Operation, Plan, diff};
pub use session::{Answer, Capture, Outcome, Session};
pub use store::{RemindersCli, StoreError, TaskStore};
pub use types::{InvalidFileError, Snapshot, Task, TaskId};
pub use workspace::Workspace;
