//! Interactive edit session: capture, edit, diff, confirm, apply.
//!
//! A session moves through these states:
//!
//! ```text
//! Capturing -> Editing -> Diffing -> AwaitingConfirmation -> Applying -> Cleanup
//!                 ^                          |  \
//!                 +------- re-edit ----------+   +-> Aborted -> Cleanup
//! ```
//!
//! Diffing goes straight to Cleanup when there is nothing to do. Re-editing
//! reopens the same buffer against the same captured snapshot; the store is
//! not queried again. Cleanup removes the buffer. If any step fails the buffer
//! is left on disk and its path is attached to the error.

use crate::codec::{decode, encode};
use crate::editor::Editor;
use crate::palette::Palette;
use crate::reconcile::{Operation, Plan, diff};
use crate::store::TaskStore;
use crate::types::Snapshot;
use crate::workspace::Workspace;
use eyre::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Prompt shown after the summary.
pub const CONFIRM_PROMPT: &str = "Answer(y/n/r): ";

/// A reply to the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    ReEdit,
}

impl Answer {
    /// Parse a reply; case and surrounding whitespace are ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "ye" | "yes" => Some(Answer::Yes),
            "n" | "no" => Some(Answer::No),
            "r" | "re" | "reedit" | "re-edit" => Some(Answer::ReEdit),
            _ => None,
        }
    }
}

/// Ask until a recognised answer arrives. End of input declines.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<Answer> {
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read answer")? == 0 {
            writeln!(output)?;
            return Ok(Answer::No);
        }
        if let Some(answer) = Answer::parse(&line) {
            return Ok(answer);
        }
    }
}

/// Human-readable list of pending operations, grouped by kind.
pub fn render_summary(plan: &Plan, palette: &Palette) -> String {
    let mut adds = Vec::new();
    let mut updates = Vec::new();
    let mut deletes = Vec::new();
    let mut completes = Vec::new();

    for op in plan {
        match op {
            Operation::Add { content } => adds.push(format!("  {} \"{}\"\n", palette.add("Add"), content)),
            Operation::Update { old, new, .. } => updates.push(format!(
                "  {} \"{}\" {} \"{}\"\n",
                palette.update("Update"),
                old,
                palette.update("->"),
                new
            )),
            Operation::Delete { content, .. } => {
                deletes.push(format!("  {} \"{}\"\n", palette.delete("Delete"), content))
            }
            Operation::Complete { content, .. } => {
                completes.push(format!("  {} \"{}\"\n", palette.complete("Complete"), content))
            }
        }
    }

    let mut summary = String::from("Confirm:\n");
    for line in adds.into_iter().chain(updates).chain(deletes).chain(completes) {
        summary.push_str(&line);
    }
    summary
}

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The edited buffer matched the captured list.
    NothingToDo,
    /// The user declined the changes.
    Aborted,
    /// All operations were sent to the store.
    Applied { count: usize },
}

/// State captured before the editor opens.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Tasks as the store listed them
    pub old: Snapshot,

    /// Buffer file the user edits
    pub buffer: PathBuf,

    /// Copy of the untouched buffer
    pub backup: PathBuf,
}

enum State {
    Editing,
    Diffing,
    AwaitingConfirmation(Plan),
    Applying(Plan),
    Aborted,
    Cleanup(Outcome),
}

/// One interactive edit of the selected list.
pub struct Session<'a, S: TaskStore + ?Sized, E: Editor + ?Sized> {
    store: &'a mut S,
    editor: &'a E,
    workspace: &'a Workspace,
    palette: Palette,
}

impl<'a, S: TaskStore + ?Sized, E: Editor + ?Sized> Session<'a, S, E> {
    pub fn new(store: &'a mut S, editor: &'a E, workspace: &'a Workspace, palette: Palette) -> Self {
        Self {
            store,
            editor,
            workspace,
            palette,
        }
    }

    /// Run a full session, reading answers from `input` and reporting to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Outcome> {
        let capture = self.capture()?;

        match self.drive(&capture, input, output) {
            Ok(outcome) => {
                self.workspace.remove_buffer(&capture.buffer)?;
                info!("Session finished: {:?}", outcome);
                Ok(outcome)
            }
            Err(err) => Err(err.wrap_err(format!("Edit not applied; your buffer is kept at {}", capture.buffer.display()))),
        }
    }

    /// Fetch the list, write it to a fresh buffer, and back the buffer up.
    pub fn capture(&mut self) -> Result<Capture> {
        let tasks = self
            .store
            .tasks()
            .with_context(|| format!("Failed to list tasks in {}", self.store.current_list()))?;
        let old = Snapshot::from_tasks(tasks.iter().cloned())
            .map_err(|e| eyre::eyre!(e))
            .context("Store listing is inconsistent")?;
        info!("Captured {} task(s) from {}", old.len(), self.store.current_list());

        let buffer = self.workspace.create_buffer(&encode(&tasks))?;
        let backup = match self.workspace.backup(&buffer) {
            Ok(backup) => backup,
            Err(err) => {
                // Nothing edited yet; the buffer only mirrors the store.
                if let Err(cleanup) = self.workspace.remove_buffer(&buffer) {
                    warn!("{:#}", cleanup);
                }
                return Err(err);
            }
        };

        Ok(Capture { old, buffer, backup })
    }

    fn drive<R: BufRead, W: Write>(&mut self, capture: &Capture, input: &mut R, output: &mut W) -> Result<Outcome> {
        let mut state = State::Editing;

        loop {
            state = match state {
                State::Editing => {
                    self.editor.edit(&capture.buffer)?;
                    State::Diffing
                }

                State::Diffing => {
                    let plan = self.reconcile(capture)?;
                    if plan.is_empty() {
                        State::Cleanup(Outcome::NothingToDo)
                    } else {
                        State::AwaitingConfirmation(plan)
                    }
                }

                State::AwaitingConfirmation(plan) => {
                    write!(output, "{}", render_summary(&plan, &self.palette))?;
                    let answer = ask(input, output, CONFIRM_PROMPT)?;
                    writeln!(output)?;
                    debug!("Answer: {:?}", answer);
                    match answer {
                        Answer::Yes => State::Applying(plan),
                        Answer::No => State::Aborted,
                        Answer::ReEdit => State::Editing,
                    }
                }

                State::Applying(plan) => {
                    let count = self.apply(&plan, output)?;
                    State::Cleanup(Outcome::Applied { count })
                }

                State::Aborted => State::Cleanup(Outcome::Aborted),

                State::Cleanup(outcome) => return Ok(outcome),
            };
        }
    }

    /// Decode the edited buffer and plan the changes against the capture.
    pub fn reconcile(&self, capture: &Capture) -> Result<Plan> {
        let text = fs::read_to_string(&capture.buffer)
            .with_context(|| format!("Failed to read buffer {}", capture.buffer.display()))?;

        let new = decode(&text, capture.old.max_id()).map_err(|e| eyre::eyre!(e))?;
        let changes = diff(&capture.old, &new);
        debug!(
            "Diff: {} add, {} update, {} delete, {} complete",
            changes.adding.len(),
            changes.updating.len(),
            changes.deleting.len(),
            changes.completing.len()
        );

        Plan::build(&capture.old, &new, &changes).map_err(|e| eyre::eyre!(e))
    }

    /// Send every operation to the store in plan order.
    ///
    /// Stops at the first failure; operations already sent stay applied.
    pub fn apply<W: Write>(&mut self, plan: &Plan, output: &mut W) -> Result<usize> {
        for op in plan {
            info!("Applying {:?}", op);
            match op {
                Operation::Add { content } => {
                    self.store
                        .add(content)
                        .with_context(|| format!("Failed to add \"{}\"", content))?;
                    writeln!(output, "{} \"{}\"", self.palette.add("Added"), content)?;
                }
                Operation::Update { id, new, .. } => {
                    self.store
                        .update(*id, new)
                        .with_context(|| format!("Failed to update task {}", id))?;
                    writeln!(output, "{} \"{}\"", self.palette.update("Updated"), new)?;
                }
                Operation::Delete { id, .. } => {
                    let removed = self
                        .store
                        .delete(*id)
                        .with_context(|| format!("Failed to delete task {}", id))?;
                    writeln!(output, "{} \"{}\"", self.palette.delete("Deleted"), removed)?;
                }
                Operation::Complete { id, .. } => {
                    let removed = self
                        .store
                        .complete(*id)
                        .with_context(|| format!("Failed to complete task {}", id))?;
                    writeln!(output, "{} \"{}\"", self.palette.complete("Completed"), removed)?;
                }
            }
        }
        Ok(plan.len())
    }
}
