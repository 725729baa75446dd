//! Whole-file writes for generated artifacts.
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! failed step never leaves a half-written artifact behind.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

/// Atomically replace `path` with `contents` (temp file + rename).
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("artifact path missing parent {}", path.display()))?;
    create_dir(parent)?;
    let tmp_path = temp_path(path);
    if let Err(err) = fs::write(&tmp_path, contents) {
        discard(&tmp_path);
        return Err(err).with_context(|| format!("write temp file {}", tmp_path.display()));
    }
    if let Err(err) = fs::rename(&tmp_path, path) {
        discard(&tmp_path);
        return Err(err).with_context(|| format!("replace {}", path.display()));
    }
    debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

fn discard(tmp_path: &Path) {
    match fs::remove_file(tmp_path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(path = %tmp_path.display(), error = %err, "failed to remove temp file"),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".tmp");
    path.with_file_name(name)
}
