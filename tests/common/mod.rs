//! Shared test infrastructure for revin integration tests.
//!
//! Provides an in-memory store that renumbers like the reminders program, a
//! scripted editor, and a TestEnv that wires them into a session.

#![allow(dead_code)]

use eyre::{Result, bail};
use revin::{Editor, Outcome, Palette, Session, Task, TaskId, TaskStore, Workspace};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A mutating call received by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(String),
    Update(TaskId, String),
    Delete(TaskId),
    Complete(TaskId),
    Uncomplete(TaskId),
}

/// Task store that keeps open tasks in a vector and uses positions as ids,
/// so removing a task shifts every task after it down by one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub list: String,
    pub open: Vec<String>,
    pub completed: Vec<String>,
    pub calls: Vec<Call>,
    pub listings: Cell<usize>,
    pub fail_on_complete: bool,
}

impl MemoryStore {
    pub fn new(tasks: &[&str]) -> Self {
        Self {
            list: "Inbox".to_string(),
            open: tasks.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    fn index(&self, id: TaskId) -> Result<usize> {
        let index = id as usize;
        if index >= self.open.len() {
            bail!("no task with id {} (list has {})", id, self.open.len());
        }
        Ok(index)
    }
}

impl TaskStore for MemoryStore {
    fn lists(&self) -> Result<Vec<String>> {
        Ok(vec![self.list.clone()])
    }

    fn select_list(&mut self, name: &str) {
        self.list = name.to_string();
    }

    fn current_list(&self) -> &str {
        &self.list
    }

    fn tasks(&self) -> Result<Vec<Task>> {
        self.listings.set(self.listings.get() + 1);
        Ok(self
            .open
            .iter()
            .enumerate()
            .map(|(i, content)| Task::new(i as TaskId, content.as_str()))
            .collect())
    }

    fn add(&mut self, content: &str) -> Result<()> {
        self.calls.push(Call::Add(content.to_string()));
        self.open.push(content.to_string());
        Ok(())
    }

    fn update(&mut self, id: TaskId, content: &str) -> Result<()> {
        self.calls.push(Call::Update(id, content.to_string()));
        let index = self.index(id)?;
        self.open[index] = content.to_string();
        Ok(())
    }

    fn delete(&mut self, id: TaskId) -> Result<String> {
        self.calls.push(Call::Delete(id));
        let index = self.index(id)?;
        Ok(self.open.remove(index))
    }

    fn complete(&mut self, id: TaskId) -> Result<String> {
        self.calls.push(Call::Complete(id));
        if self.fail_on_complete {
            bail!("store refused to complete task {}", id);
        }
        let index = self.index(id)?;
        let content = self.open.remove(index);
        self.completed.push(content.clone());
        Ok(content)
    }

    fn uncomplete(&mut self, id: TaskId) -> Result<String> {
        self.calls.push(Call::Uncomplete(id));
        let index = id as usize;
        if index >= self.completed.len() {
            bail!("no completed task with id {}", id);
        }
        let content = self.completed.remove(index);
        self.open.push(content.clone());
        Ok(content)
    }
}

/// Editor that replaces the buffer with prepared contents, one per launch.
///
/// Once the script runs out the buffer is left untouched.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    edits: RefCell<VecDeque<String>>,
    seen: RefCell<Vec<String>>,
}

impl ScriptedEditor {
    pub fn new(edits: &[&str]) -> Self {
        Self {
            edits: RefCell::new(edits.iter().map(|e| e.to_string()).collect()),
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Buffer contents as found at each launch.
    pub fn seen(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }

    pub fn launches(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Editor for ScriptedEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        self.seen.borrow_mut().push(fs::read_to_string(path)?);
        if let Some(next) = self.edits.borrow_mut().pop_front() {
            fs::write(path, next)?;
        }
        Ok(())
    }
}

/// Result of one session run.
pub struct Run {
    pub result: Result<Outcome>,
    pub output: String,
}

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub workspace: Workspace,
    pub store: MemoryStore,
}

impl TestEnv {
    /// Create an environment whose store holds `tasks` with ids 0, 1, 2, ...
    pub fn new(tasks: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let workspace = Workspace::init(&temp_dir.path().join("revin")).expect("Failed to init workspace");
        Self {
            temp_dir,
            workspace,
            store: MemoryStore::new(tasks),
        }
    }

    /// Run a session with `answers` fed to the confirmation prompt.
    pub fn run(&mut self, editor: &ScriptedEditor, answers: &str) -> Run {
        let mut input = Cursor::new(answers.to_string());
        let mut output = Vec::new();
        let result =
            Session::new(&mut self.store, editor, &self.workspace, Palette::plain()).run(&mut input, &mut output);
        Run {
            result,
            output: String::from_utf8(output).expect("Output is not UTF-8"),
        }
    }

    /// Files currently in the buffer directory.
    pub fn buffers(&self) -> Vec<PathBuf> {
        list_dir(&self.workspace.tmp_dir())
    }

    /// Files currently in the backup directory.
    pub fn backups(&self) -> Vec<PathBuf> {
        list_dir(&self.workspace.backup_dir())
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect();
    paths.sort();
    paths
}
