//! Launching the user's text editor on a buffer file.

use eyre::{Context, Result, bail};
use log::{debug, warn};
use std::path::Path;
use std::process::Command;

/// Editor used when neither configuration nor environment name one.
pub const FALLBACK_EDITOR: &str = "vi";

/// Something that lets the user modify a file in place.
pub trait Editor {
    /// Block until the user is done editing `path`.
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Runs an external editor program with the buffer path as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    command: Vec<String>,
}

impl ExternalEditor {
    /// Parse a shell-style command line such as `code --wait`.
    pub fn from_command_line(raw: &str) -> Result<Self> {
        let command = match shlex::split(raw) {
            Some(parts) if !parts.is_empty() => parts,
            Some(_) => bail!("editor command is empty"),
            // Unbalanced quotes; use the string as a single program name
            None => vec![raw.trim().to_string()],
        };
        Ok(Self { command })
    }

    /// Pick the editor from an explicit setting, then `$VISUAL`, then `$EDITOR`.
    pub fn resolve(configured: Option<&str>) -> Result<Self> {
        let from_env = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty());

        let raw = configured
            .filter(|value| !value.trim().is_empty())
            .map(String::from)
            .or(from_env)
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());

        Self::from_command_line(&raw)
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| eyre::eyre!("editor command not specified"))?;

        debug!("Launching editor: {} {:?} {}", program, args, path.display());
        let status = Command::new(program)
            .args(args)
            .arg(path)
            .status()
            .with_context(|| format!("Failed to launch editor {}", program))?;

        // Editors report all sorts of things through their exit code; only
        // the fact that it returned matters.
        if !status.success() {
            warn!("Editor {} exited with {}", program, status);
        }

        Ok(())
    }
}
