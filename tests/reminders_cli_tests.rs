//! Integration tests for the reminders CLI adapter.
//!
//! Drives `RemindersCli` against a stand-in shell script that logs its
//! arguments and prints output shaped like the real program's.

#![cfg(unix)]

use revin::{RemindersCli, StoreError, Task, TaskStore};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCRIPT: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/calls.log"
if [ "$2" = "Missing" ]; then
  echo "No reminders list matching Missing" >&2
  exit 1
fi
case "$1" in
  show-lists) printf 'Inbox\nGroceries\n\n' ;;
  show)
    case "$2" in
      Empty) printf '\n' ;;
      Garbled) echo "Reminders output format v2" ;;
      *) printf '0: buy milk\n1: plan trip\n   book hotel\n2: call mom\n' ;;
    esac ;;
  delete) echo "Deleted 'buy milk'" ;;
  complete) printf 'Completing...\nCompleted "call mom"\n' ;;
  uncomplete) echo "Uncompleted 'call mom'" ;;
esac
"#;

fn install_script(dir: &Path) -> PathBuf {
    let path = dir.join("reminders");
    fs::write(&path, SCRIPT).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

// Everything runs in one test so no other thread forks while the script is
// still open for writing.
#[test]
fn test_reminders_cli_against_script() {
    let temp_dir = TempDir::new().unwrap();
    let program = install_script(temp_dir.path());
    let mut store = RemindersCli::new(&program, "Inbox");

    // Listing
    assert_eq!(store.lists().unwrap(), vec!["Inbox", "Groceries"]);
    assert_eq!(
        store.tasks().unwrap(),
        vec![
            Task::new(0, "buy milk"),
            Task::new(1, "plan trip book hotel"),
            Task::new(2, "call mom"),
        ]
    );

    // Mutations
    store.add("walk dog").unwrap();
    store.update(2, "call mom tonight").unwrap();
    assert_eq!(store.delete(0).unwrap(), "buy milk");
    assert_eq!(store.complete(1).unwrap(), "call mom");
    assert_eq!(store.uncomplete(0).unwrap(), "call mom");

    // List selection applies to later calls
    store.select_list("Groceries");
    store.add("eggs").unwrap();

    assert_eq!(
        calls(temp_dir.path()),
        vec![
            "show-lists",
            "show Inbox",
            "add Inbox walk dog",
            "edit Inbox 2 call mom tonight",
            "delete Inbox 0",
            "complete Inbox 1",
            "uncomplete Inbox 0",
            "add Groceries eggs",
        ]
    );

    // Non-zero exit carries stderr
    store.select_list("Missing");
    let err = store.tasks().unwrap_err();
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::CommandFailed { status, stderr, .. }) => {
            assert_eq!(*status, Some(1));
            assert!(stderr.contains("No reminders list matching Missing"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(store.delete(0).is_err());

    // An empty list is fine, but output without any entry is not
    store.select_list("Empty");
    assert!(store.tasks().unwrap().is_empty());

    store.select_list("Garbled");
    let err = store.tasks().unwrap_err();
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::UnexpectedOutput { command, output }) => {
            assert!(command.ends_with("show Garbled"));
            assert_eq!(output, "Reminders output format v2");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
