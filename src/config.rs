//! Configuration for revin.
//!
//! Values are layered, highest priority first:
//! 1. Command-line overrides
//! 2. Environment (`NO_COLOR`; `VISUAL`/`EDITOR` are consulted by the editor)
//! 3. YAML file (`<config_dir>/revin/config.yaml` or an explicit path)
//! 4. Built-in defaults
//!
//! A missing default config file is fine. A missing explicit one is an error.

use eyre::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default reminders program, looked up on `PATH`.
pub const DEFAULT_REMINDERS_CMD: &str = "reminders";

/// List edited when none is given.
pub const DEFAULT_LIST: &str = "Inbox";

/// Name of the application home directory under `$HOME`.
const APP_DIR: &str = "revin";

/// Config file name within `<config_dir>/revin`.
const CONFIG_FILE: &str = "config.yaml";

/// Contents of the YAML file; every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub reminders_cmd: Option<PathBuf>,
    pub editor: Option<String>,
    pub home: Option<PathBuf>,
    pub list: Option<String>,
    pub color: Option<bool>,
}

impl ConfigFile {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes as unit, not a mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse config file")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub reminders_cmd: Option<PathBuf>,
    pub editor: Option<String>,
    pub home: Option<PathBuf>,
    pub list: Option<String>,
    pub no_color: bool,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, list: impl Into<String>) -> Self {
        self.list = Some(list.into());
        self
    }

    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_reminders_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.reminders_cmd = Some(cmd.into());
        self
    }

    pub fn without_color(mut self) -> Self {
        self.no_color = true;
        self
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path or name of the reminders program
    pub reminders_cmd: PathBuf,

    /// Editor command line; `None` defers to `$VISUAL`/`$EDITOR`
    pub editor: Option<String>,

    /// Application home holding `tmp/` and `backup/`
    pub home: PathBuf,

    /// List to edit
    pub list: String,

    /// Colour terminal output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminders_cmd: PathBuf::from(DEFAULT_REMINDERS_CMD),
            editor: None,
            home: default_home(),
            list: DEFAULT_LIST.to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Location of the config file when none is given explicitly.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the file layer and apply environment and command-line overrides.
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let file = match explicit {
            Some(path) => {
                info!("Loading config from {}", path.display());
                ConfigFile::read(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => {
                    info!("Loading config from {}", path.display());
                    ConfigFile::read(&path)?
                }
                _ => {
                    debug!("No config file, using defaults");
                    ConfigFile::default()
                }
            },
        };

        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Ok(Self::resolve(file, overrides, no_color_env))
    }

    /// Merge layers without touching the filesystem or environment.
    pub fn resolve(file: ConfigFile, overrides: &ConfigOverrides, no_color_env: bool) -> Self {
        let defaults = Self::default();
        Self {
            reminders_cmd: overrides
                .reminders_cmd
                .clone()
                .or(file.reminders_cmd)
                .unwrap_or(defaults.reminders_cmd),
            editor: overrides.editor.clone().or(file.editor),
            home: overrides
                .home
                .clone()
                .or(file.home)
                .map(|home| expand_tilde(&home))
                .unwrap_or(defaults.home),
            list: overrides.list.clone().or(file.list).unwrap_or(defaults.list),
            color: !overrides.no_color && !no_color_env && file.color.unwrap_or(defaults.color),
        }
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}
