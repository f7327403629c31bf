//! Log writer - appends rendered lines to date-partitioned files
//!
//! Each call opens, appends and closes; no handle outlives a write.
//! Concurrent writers rely on `O_APPEND` and a single `write_all` per line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{LogCategory, LogTarget};
use crate::error::LogWriteError;

/// Mode for created log directories (rwxr--r--).
pub const DIR_MODE: u32 = 0o744;

/// Writes lines below one base folder.
#[derive(Debug, Clone)]
pub struct LogWriter {
    base_folder: PathBuf,
}

impl LogWriter {
    pub fn new(base_folder: impl Into<PathBuf>) -> Self {
        Self {
            base_folder: base_folder.into(),
        }
    }

    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    pub fn target(&self, category: LogCategory, date: NaiveDate) -> LogTarget {
        LogTarget::new(&self.base_folder, category, date)
    }

    /// Append `line` to the file of `category` for `date`.
    ///
    /// Returns `false` on any I/O failure; the cause is reported through `tracing`.
    pub fn write(&self, category: LogCategory, date: NaiveDate, line: &str) -> bool {
        let target = self.target(category, date);
        match append_line(&target, line) {
            Ok(path) => {
                debug!("[LogWriter] Appended {} bytes to {:?}", line.len(), path);
                true
            }
            Err(e) => {
                warn!("[LogWriter] {}", e);
                false
            }
        }
    }
}

/// Create the target directory if needed and append one line.
pub fn append_line(target: &LogTarget, line: &str) -> Result<PathBuf, LogWriteError> {
    let dir = target.dir();
    ensure_dir(&dir)?;

    let path = dir.join(target.file_name());
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LogWriteError::Open {
            path: path.clone(),
            source,
        })?;

    file.write_all(line.as_bytes())
        .map_err(|source| LogWriteError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

/// Recursively create `dir`, giving every newly created level [`DIR_MODE`].
fn ensure_dir(dir: &Path) -> Result<(), LogWriteError> {
    if dir.is_dir() {
        return Ok(());
    }

    // levels that do not exist yet, outermost last
    let missing: Vec<PathBuf> = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .map(Path::to_path_buf)
        .collect();

    create_dir_all(dir).map_err(|source| LogWriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for path in missing.iter().rev() {
        set_dir_mode(path).map_err(|source| LogWriteError::CreateDir {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(unix)]
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(dir)
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// The creation mode is filtered by the umask; set it explicitly.
#[cfg(unix)]
fn set_dir_mode(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(DIR_MODE))
}

#[cfg(not(unix))]
fn set_dir_mode(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
