//! On-disk layout: per-session buffers and timestamped backups.

use chrono::Local;
use eyre::{Context, Result};
use log::{debug, info};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory for per-session edit buffers.
const TMP_DIR: &str = "tmp";

/// Directory for backup copies of each buffer.
const BACKUP_DIR: &str = "backup";

/// Extension used for backup copies.
const BACKUP_EXT: &str = "tsv";

/// Application home directory and its subdirectories.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the directory layout under `root` if needed.
    pub fn init(root: &Path) -> Result<Self> {
        let workspace = Self {
            root: root.to_path_buf(),
        };
        fs::create_dir_all(workspace.tmp_dir()).context("Failed to create buffer directory")?;
        fs::create_dir_all(workspace.backup_dir()).context("Failed to create backup directory")?;
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }

    /// Write `contents` to a fresh, uniquely named buffer file.
    pub fn create_buffer(&self, contents: &str) -> Result<PathBuf> {
        let token: u64 = rand::rng().random();
        let path = self.tmp_dir().join(format!("{:016x}.txt", token));
        fs::write(&path, contents).with_context(|| format!("Failed to write buffer {}", path.display()))?;
        debug!("Created buffer {}", path.display());
        Ok(path)
    }

    /// Copy a buffer into the backup directory under a timestamped name.
    pub fn backup(&self, buffer: &Path) -> Result<PathBuf> {
        let stamp = Local::now().format("%Y-%m-%d-%H%M%S").to_string();
        let dir = self.backup_dir();

        let mut target = dir.join(format!("{}.{}", stamp, BACKUP_EXT));
        let mut suffix = 1;
        while target.exists() {
            target = dir.join(format!("{}-{}.{}", stamp, suffix, BACKUP_EXT));
            suffix += 1;
        }

        fs::copy(buffer, &target).with_context(|| format!("Failed to back up buffer to {}", target.display()))?;
        info!("Backed up buffer to {}", target.display());
        Ok(target)
    }

    /// Remove a buffer file.
    pub fn remove_buffer(&self, buffer: &Path) -> Result<()> {
        fs::remove_file(buffer).with_context(|| format!("Failed to remove buffer {}", buffer.display()))?;
        debug!("Removed buffer {}", buffer.display());
        Ok(())
    }
}
