//! Atomic file operations
//!
//! This module provides utilities for atomic file writes to prevent
//! data corruption during crashes or power failures.
//!
//! # Pattern
//!
//! 1. Write to a temporary file (`<file>.tmp`)
//! 2. Call sync_all() to flush to disk
//! 3. Move the current file aside as a backup (optional)
//! 4. Rename temp file to final path (atomic on most filesystems)
//!
//! A reader therefore finds either the old document, the new document, or
//! (between steps 3 and 4) only the backup. Never a partial file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Temp path used while writing `path` (`<file>.tmp`)
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically write content using a writer function
///
/// If `backup` is given and `path` already exists, the existing file is kept
/// at `backup` before the new one takes its place.
///
/// # Example
///
/// ```ignore
/// atomic_write_with("data/scores.json", Some("data/scores.json.bak"), |file| {
///     serde_json::to_writer_pretty(&mut *file, &document)?;
///     Ok(())
/// })?;
/// ```
pub fn atomic_write_with<P, B, F>(path: P, backup: Option<B>, write_fn: F) -> io::Result<()>
where
    P: AsRef<Path>,
    B: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let written = (|| {
        let mut file = File::create(&temp_path)?;
        write_fn(&mut file)?;
        file.sync_all()
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    safe_rename(&temp_path, path, backup)?;
    Ok(())
}

/// Safely rename a file, creating a backup if the destination exists
///
/// # Returns
///
/// * `Ok(true)` - File was renamed successfully
/// * `Ok(false)` - Source file doesn't exist
/// * `Err(...)` - An error occurred
pub fn safe_rename<P1, P2, P3>(from: P1, to: P2, backup: Option<P3>) -> io::Result<bool>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let from = from.as_ref();
    let to = to.as_ref();

    if !from.exists() {
        return Ok(false);
    }

    if let Some(backup_path) = backup {
        if to.exists() {
            let backup = backup_path.as_ref();
            if backup.exists() {
                fs::remove_file(backup)?;
            }
            fs::rename(to, backup)?;
        }
    }

    fs::rename(from, to)?;

    Ok(true)
}

/// Remove the temp file an interrupted write of `path` left behind
///
/// Only `temp_path_for(path)` is touched. Returns whether it existed.
pub fn remove_stale_temp<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let temp_path = temp_path_for(path.as_ref());

    match fs::remove_file(&temp_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
