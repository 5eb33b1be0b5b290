//! Write journal for install batches
//!
//! Records every artifact written during one batch so the batch can be
//! undone, newest write first. A write that replaced an existing file keeps
//! the previous bytes and is restored; a write that created a file is
//! deleted. Directories the batch created are removed if they end up empty.
//!
//! ## Usage
//!
//! ```ignore
//! let mut journal = WriteJournal::new();
//!
//! // After each successful write:
//! journal.record("auth", &path, previous_bytes);
//!
//! // Keep everything:
//! journal.commit();
//!
//! // Or undo (also happens automatically on drop if not committed):
//! let undone = journal.rollback();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

/// One recorded write
#[derive(Debug, Clone)]
struct JournalEntry {
    /// Resource the write belongs to
    owner: String,
    path: PathBuf,
    /// Content before the write, `None` when the file did not exist
    previous: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct WriteJournal {
    entries: Vec<JournalEntry>,

    /// Directories created during this batch
    created_dirs: Vec<PathBuf>,

    committed: bool,
}

impl WriteJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed write of `path` on behalf of `owner`
    pub fn record(&mut self, owner: &str, path: &Path, previous: Option<Vec<u8>>) {
        self.entries.push(JournalEntry {
            owner: owner.to_string(),
            path: path.to_path_buf(),
            previous,
        });
    }

    /// Track directories created for a write, outermost first
    pub fn track_dirs_created(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.created_dirs.extend(dirs);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep every recorded write
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo recorded writes in reverse order
    ///
    /// Returns the owners whose writes were undone, most recent first.
    /// Failures are logged and skipped; the remaining entries are still
    /// processed.
    pub fn rollback(&mut self) -> Vec<String> {
        if self.committed {
            return Vec::new();
        }

        let mut undone: Vec<String> = Vec::new();
        while let Some(entry) = self.entries.pop() {
            let result = match &entry.previous {
                Some(previous) => fs::write(&entry.path, previous),
                None => match fs::remove_file(&entry.path) {
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    other => other,
                },
            };

            match result {
                Ok(()) => {
                    tracing::debug!(owner = %entry.owner, path = %entry.path.display(), "rolled back write");
                }
                Err(e) => {
                    tracing::warn!(
                        owner = %entry.owner,
                        path = %entry.path.display(),
                        error = %e,
                        "failed to roll back write"
                    );
                }
            }

            if !undone.contains(&entry.owner) {
                undone.push(entry.owner);
            }
        }

        // Deepest first, and only when empty
        let mut dirs = std::mem::take(&mut self.created_dirs);
        dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
        for dir in dirs {
            let empty = fs::read_dir(&dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if empty {
                let _ = fs::remove_dir(&dir);
            }
        }

        undone
    }
}

impl Drop for WriteJournal {
    fn drop(&mut self) {
        if !self.committed && !self.entries.is_empty() {
            tracing::warn!(writes = self.entries.len(), "uncommitted write journal dropped, rolling back");
            self.rollback();
        }
    }
}
