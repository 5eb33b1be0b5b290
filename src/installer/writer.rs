//! Atomic artifact writes
//!
//! Content is written to a temporary file in the destination's directory,
//! synced, and then renamed over the destination. Until [`StagedWrite::commit`]
//! the destination is untouched; dropping a staged write removes the
//! temporary file. A reader sees the old file or the new one, never a
//! truncated mix.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Content staged next to its destination, not yet visible there
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    destination: PathBuf,
    created_dirs: Vec<PathBuf>,
}

impl StagedWrite {
    /// Rename the staged content over the destination
    ///
    /// Returns the directories created for this write, outermost first.
    pub fn commit(self) -> io::Result<Vec<PathBuf>> {
        self.temp
            .persist(&self.destination)
            .map_err(|e| e.error)?;
        Ok(self.created_dirs)
    }
}

/// Create the missing parent directories of `path`, outermost first
fn create_parent_dirs(path: &Path) -> io::Result<Vec<PathBuf>> {
    let Some(parent) = path.parent() else {
        return Ok(Vec::new());
    };
    let mut missing: Vec<PathBuf> = parent
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect();
    missing.reverse();

    fs::create_dir_all(parent)?;
    Ok(missing)
}

/// Write `bytes` to a temporary file beside `destination`
pub fn stage(destination: &Path, bytes: &[u8]) -> io::Result<StagedWrite> {
    let created_dirs = create_parent_dirs(destination)?;
    let dir = destination
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    Ok(StagedWrite {
        temp,
        destination: destination.to_path_buf(),
        created_dirs,
    })
}

/// Stage and commit in one step
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> io::Result<Vec<PathBuf>> {
    stage(destination, bytes)?.commit()
}
