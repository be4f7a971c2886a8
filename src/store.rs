//! Task store adapter backed by the `reminders` command-line program.

use crate::types::{Task, TaskId};
use eyre::{Context, Result};
use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static ENTRY_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+): (.*)$").expect("regex"));

/// Errors that can occur while talking to the store program.
#[derive(Debug)]
pub enum StoreError {
    /// The program exited unsuccessfully.
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    /// The program's output did not have the expected shape.
    UnexpectedOutput { command: String, output: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::CommandFailed { command, status, stderr } => {
                match status {
                    Some(code) => write!(f, "`{}` exited with status {}", command, code)?,
                    None => write!(f, "`{}` was terminated by a signal", command)?,
                }
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            StoreError::UnexpectedOutput { command, output } => {
                write!(f, "unexpected output from `{}`: {:?}", command, output)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Operations the session needs from a task list backend.
///
/// `delete` and `complete` remove the task from the open listing; the backend
/// may renumber the tasks that remain.
pub trait TaskStore {
    /// Names of all lists.
    fn lists(&self) -> Result<Vec<String>>;

    /// Make `name` the list that subsequent calls operate on.
    fn select_list(&mut self, name: &str);

    /// Currently selected list.
    fn current_list(&self) -> &str;

    /// Open tasks of the selected list, in listing order.
    fn tasks(&self) -> Result<Vec<Task>>;

    fn add(&mut self, content: &str) -> Result<()>;

    fn update(&mut self, id: TaskId, content: &str) -> Result<()>;

    /// Returns the content of the removed task.
    fn delete(&mut self, id: TaskId) -> Result<String>;

    /// Returns the content of the completed task.
    fn complete(&mut self, id: TaskId) -> Result<String>;

    /// Returns the content of the reopened task.
    fn uncomplete(&mut self, id: TaskId) -> Result<String>;
}

/// [`TaskStore`] that shells out to the `reminders` CLI.
#[derive(Debug, Clone)]
pub struct RemindersCli {
    program: PathBuf,
    list: String,
}

impl RemindersCli {
    pub fn new(program: impl Into<PathBuf>, list: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            list: list.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(args.iter().map(|a| a.to_string()));
        parts.join(" ")
    }

    /// Run the program and return its trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let command = self.describe(args);
        debug!("Running: {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        if !output.status.success() {
            return Err(eyre::eyre!(StoreError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run_removal(&self, verb: &str, id: TaskId) -> Result<String> {
        let id = id.to_string();
        let args = [verb, self.list.as_str(), id.as_str()];
        let output = self.run(&args)?;
        parse_removed_content(&output).ok_or_else(|| {
            eyre::eyre!(StoreError::UnexpectedOutput {
                command: self.describe(&args),
                output,
            })
        })
    }
}

impl TaskStore for RemindersCli {
    fn lists(&self) -> Result<Vec<String>> {
        let output = self.run(&["show-lists"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn select_list(&mut self, name: &str) {
        self.list = name.to_string();
    }

    fn current_list(&self) -> &str {
        &self.list
    }

    fn tasks(&self) -> Result<Vec<Task>> {
        let args = ["show", self.list.as_str()];
        let output = self.run(&args)?;
        let tasks = parse_task_listing(&output);
        if tasks.is_empty() && !output.is_empty() {
            return Err(eyre::eyre!(StoreError::UnexpectedOutput {
                command: self.describe(&args),
                output,
            }));
        }
        Ok(tasks)
    }

    fn add(&mut self, content: &str) -> Result<()> {
        self.run(&["add", self.list.as_str(), content])?;
        Ok(())
    }

    fn update(&mut self, id: TaskId, content: &str) -> Result<()> {
        self.run(&["edit", self.list.as_str(), id.to_string().as_str(), content])?;
        Ok(())
    }

    fn delete(&mut self, id: TaskId) -> Result<String> {
        self.run_removal("delete", id)
    }

    fn complete(&mut self, id: TaskId) -> Result<String> {
        self.run_removal("complete", id)
    }

    fn uncomplete(&mut self, id: TaskId) -> Result<String> {
        self.run_removal("uncomplete", id)
    }
}

/// Parse `show` output into tasks.
///
/// Entries begin with `<digits>: `; any other line continues the previous
/// entry and is joined onto it with a space. Text before the first entry is
/// ignored. Output with no entry line at all yields no tasks; `tasks` treats
/// that as unexpected unless the output was empty.
pub fn parse_task_listing(output: &str) -> Vec<Task> {
    let mut tasks: Vec<Task> = Vec::new();

    for line in output.lines() {
        if let Some(caps) = ENTRY_START.captures(line)
            && let Ok(id) = caps[1].parse::<TaskId>()
        {
            tasks.push(Task::new(id, caps[2].trim()));
            continue;
        }

        let continuation = line.trim();
        if let Some(last) = tasks.last_mut()
            && !continuation.is_empty()
        {
            if !last.content.is_empty() {
                last.content.push(' ');
            }
            last.content.push_str(continuation);
        }
    }

    tasks
}

/// Extract the task text from a removal report such as `Deleted 'buy milk'`.
///
/// Uses the last non-empty line; `complete` prints a header line first.
pub fn parse_removed_content(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).rfind(|l| !l.is_empty())?;
    let (_verb, rest) = line.split_once(' ')?;
    let rest = rest.trim();
    let unquoted = ['"', '\''].iter().find_map(|q| {
        rest.strip_prefix(*q)
            .and_then(|r| r.strip_suffix(*q))
    });
    Some(unquoted.unwrap_or(rest).to_string())
}
