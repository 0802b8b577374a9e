//! Fixture tree for the stat workload
//!
//! Layout: `<root>/<d>/<f>` for every `d` in `0..num_dirs` and `f` in
//! `0..files_per_dir`, all zero-length regular files. Names are bare decimal
//! indices, matching the paths the stat executor draws.

use crate::Result;
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Fixture tree rooted at an existing directory
#[derive(Debug, Clone)]
pub struct StatTree {
    root: PathBuf,
    num_dirs: u64,
    files_per_dir: u64,
}

/// Counts from a create or remove pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub dirs: u64,
    pub files: u64,
}

impl StatTree {
    pub fn new(root: PathBuf, num_dirs: u64, files_per_dir: u64) -> Self {
        Self {
            root,
            num_dirs,
            files_per_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of file `file` in directory `dir`
    pub fn file_path(&self, dir: u64, file: u64) -> PathBuf {
        self.root.join(dir.to_string()).join(file.to_string())
    }

    /// Create every directory and file
    ///
    /// Entries that already exist are left as they are, so an interrupted
    /// create can be resumed.
    pub fn create(&self) -> Result<TreeStats> {
        let start = Instant::now();
        let mut stats = TreeStats::default();

        for dir in 0..self.num_dirs {
            let dir_path = self.root.join(dir.to_string());
            match fs::create_dir(&dir_path) {
                Ok(()) => stats.dirs += 1,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to create directory: {}", dir_path.display())
                    })
                }
            }

            for file in 0..self.files_per_dir {
                let file_path = dir_path.join(file.to_string());
                fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .open(&file_path)
                    .with_context(|| format!("Failed to create file: {}", file_path.display()))?;
                stats.files += 1;
            }
            tracing::debug!(dir, files = self.files_per_dir, "directory populated");
        }

        tracing::info!(
            root = %self.root.display(),
            dirs = self.num_dirs,
            files_per_dir = self.files_per_dir,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fixture tree created"
        );
        Ok(stats)
    }

    /// Recursively remove `<root>/0 .. <root>/<num_dirs - 1>`
    ///
    /// Entries that are not directories are unlinked. Missing entries are
    /// skipped. Anything else under the root is kept.
    pub fn remove(&self) -> Result<TreeStats> {
        let mut stats = TreeStats::default();

        for dir in 0..self.num_dirs {
            let entry = self.root.join(dir.to_string());
            let removed = match fs::symlink_metadata(&entry) {
                Ok(meta) if meta.is_dir() => {
                    fs::remove_dir_all(&entry).map(|()| stats.dirs += 1)
                }
                Ok(_) => fs::remove_file(&entry).map(|()| stats.files += 1),
                Err(e) => Err(e),
            };
            match removed {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %entry.display(), "already absent");
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove: {}", entry.display()))
                }
            }
        }

        tracing::info!(root = %self.root.display(), dirs = stats.dirs, "fixture tree removed");
        Ok(stats)
    }
}
