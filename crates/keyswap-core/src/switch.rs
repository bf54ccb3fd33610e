//! Switching the active identity.
//!
//! A switch removes every recognized active key file from the store root
//! and then copies each file of the chosen identity folder into the root
//! under the same name. Copies are owner-only (`0600`).

use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{KeyswapError, KeyswapResult};
use crate::listing::DirLister;
use crate::store::Store;

/// One file copied into the store root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub src: PathBuf,
    pub dst: PathBuf,
}

/// Outcome of [`switch_to`].
#[derive(Debug)]
pub struct SwitchReport {
    pub folder: OsString,
    pub removed: Vec<PathBuf>,
    pub copied: Vec<CopiedFile>,
    pub failed: Vec<(PathBuf, KeyswapError)>,
    /// Set when the folder could not be listed after the old keys were
    /// already removed; nothing was copied.
    pub unreadable: Option<KeyswapError>,
}

impl SwitchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.unreadable.is_none()
    }
}

/// Parse a 1-based menu selection against `count` choices.
///
/// Returns the 0-based index.
pub fn parse_selection(input: &str, count: usize) -> KeyswapResult<usize> {
    let input = input.trim();
    let choice: i64 = input
        .parse()
        .map_err(|_| KeyswapError::InvalidSelection(format!("'{input}' is not a number")))?;

    if choice < 1 || choice as u64 > count as u64 {
        return Err(KeyswapError::InvalidSelection(format!(
            "{choice} is not between 1 and {count}"
        )));
    }
    Ok(choice as usize - 1)
}

/// Delete the recognized active key files that exist in the root.
///
/// Best effort: a failed removal is logged and skipped.
pub fn remove_active_keys(store: &Store) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for name in store.active_file_names() {
        let path = store.root().join(&name);
        if fs::symlink_metadata(&path).is_err() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed active key");
                removed.push(path);
            }
            Err(e) => warn!(path = %path.display(), "failed to remove active key: {e}"),
        }
    }
    removed
}

/// Copy one key file, leaving the destination readable only by its owner.
pub fn copy_key_file(src: &Path, dst: &Path) -> KeyswapResult<u64> {
    let meta = fs::symlink_metadata(src)?;
    if !meta.file_type().is_file() {
        return Err(KeyswapError::NotRegularFile(src.to_path_buf()));
    }

    let mut source = File::open(src)?;
    let mut destination = open_private(dst)?;
    let bytes = io::copy(&mut source, &mut destination)?;
    restrict_permissions(dst)?;

    Ok(bytes)
}

/// Replace the active key files with the contents of `folder`.
///
/// Fails without touching the root if the folder is missing. Once the old
/// keys are removed every later problem lands in the report instead: an
/// unlistable folder in [`SwitchReport::unreadable`], per-file copy
/// failures in [`SwitchReport::failed`].
pub fn switch_to(
    store: &Store,
    lister: &dyn DirLister,
    folder: &OsStr,
) -> KeyswapResult<SwitchReport> {
    let dir = store.identity_dir(folder);
    if !dir.is_dir() {
        return Err(KeyswapError::MissingFolder(dir));
    }

    let mut report = SwitchReport {
        folder: folder.to_os_string(),
        removed: remove_active_keys(store),
        copied: Vec::new(),
        failed: Vec::new(),
        unreadable: None,
    };

    let entries = match lister.entries(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), removed = report.removed.len(), "failed to read folder: {e}");
            report.unreadable = Some(e);
            return Ok(report);
        }
    };

    for entry in entries {
        let src = dir.join(&entry.name);
        let dst = store.root().join(&entry.name);

        if entry.is_dir {
            report
                .failed
                .push((src.clone(), KeyswapError::NotRegularFile(src)));
            continue;
        }

        match copy_key_file(&src, &dst) {
            Ok(bytes) => {
                debug!(src = %src.display(), bytes, "copied key file");
                report.copied.push(CopiedFile { src, dst });
            }
            Err(e) => {
                warn!(src = %src.display(), "failed to copy key file: {e}");
                report.failed.push((src, e));
            }
        }
    }

    info!(
        folder = ?folder,
        removed = report.removed.len(),
        copied = report.copied.len(),
        failed = report.failed.len(),
        "switched identity"
    );

    Ok(report)
}

fn open_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

fn restrict_permissions(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
