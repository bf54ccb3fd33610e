//! Directory listing behind a replaceable interface.
//!
//! The order entries come back in is whatever the lister yields; for
//! [`FsLister`] that is the operating system's `read_dir` order. Menu
//! numbering follows that order, so nothing here sorts. Names are kept as
//! `OsString` so entries that are not valid UTF-8 still round-trip to the
//! same path.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{KeyswapError, KeyswapResult};
use crate::store::{is_identity_name, Store};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub is_dir: bool,
}

impl DirEntryInfo {
    pub fn file(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Lists the immediate entries of a directory.
pub trait DirLister {
    fn entries(&self, dir: &Path) -> KeyswapResult<Vec<DirEntryInfo>>;
}

/// Lister backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirLister for FsLister {
    fn entries(&self, dir: &Path) -> KeyswapResult<Vec<DirEntryInfo>> {
        let unreadable = |source: std::io::Error| KeyswapError::UnreadableDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut out = Vec::new();
        for entry in fs::read_dir(dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            out.push(DirEntryInfo {
                name: entry.file_name(),
                is_dir,
            });
        }
        Ok(out)
    }
}

/// Lister that returns a fixed, ordered set of entries per directory.
///
/// Directories without an entry are reported as unreadable.
#[derive(Debug, Default, Clone)]
pub struct StaticLister {
    dirs: HashMap<PathBuf, Vec<DirEntryInfo>>,
}

impl StaticLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listing for `dir`, replacing any previous one.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>, entries: Vec<DirEntryInfo>) -> Self {
        self.dirs.insert(dir.into(), entries);
        self
    }
}

impl DirLister for StaticLister {
    fn entries(&self, dir: &Path) -> KeyswapResult<Vec<DirEntryInfo>> {
        self.dirs
            .get(dir)
            .cloned()
            .ok_or_else(|| KeyswapError::UnreadableDir {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in fixture"),
            })
    }
}

/// Names of the identity folders under the store root, in listing order.
///
/// An unreadable root yields an empty list after logging a diagnostic.
pub fn identity_folders(store: &Store, lister: &dyn DirLister) -> Vec<OsString> {
    match lister.entries(store.root()) {
        Ok(entries) => {
            let folders: Vec<OsString> = entries
                .into_iter()
                .filter(|e| e.is_dir && is_identity_name(&e.name))
                .map(|e| e.name)
                .collect();
            debug!(root = %store.root().display(), count = folders.len(), "listed identity folders");
            folders
        }
        Err(e) => {
            warn!(root = %store.root().display(), "failed to read SSH directory: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_fixture_order_and_filters() {
        let lister = StaticLister::new().with_dir(
            "/ssh",
            vec![
                DirEntryInfo::dir("_zeta"),
                DirEntryInfo::file("id_rsa"),
                DirEntryInfo::dir("plain"),
                DirEntryInfo::file("_not_a_dir"),
                DirEntryInfo::dir("_alpha"),
            ],
        );
        let store = Store::new("/ssh");
        assert_eq!(identity_folders(&store, &lister), vec!["_zeta", "_alpha"]);
    }

    #[test]
    fn unreadable_root_is_empty() {
        let store = Store::new("/nowhere");
        assert!(identity_folders(&store, &StaticLister::new()).is_empty());
        assert!(identity_folders(&store, &FsLister).is_empty());
    }

    #[test]
    fn fs_lister_reports_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("_work")).unwrap();
        fs::create_dir(tmp.path().join("other")).unwrap();
        fs::write(tmp.path().join("_file"), b"x").unwrap();

        let store = Store::new(tmp.path());
        assert_eq!(identity_folders(&store, &FsLister), vec!["_work"]);

        let mut entries = FsLister.entries(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![
                DirEntryInfo::file("_file"),
                DirEntryInfo::dir("_work"),
                DirEntryInfo::dir("other"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_folder_names_survive() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"_caf\xe9");
        fs::create_dir(tmp.path().join(name)).unwrap();

        let store = Store::new(tmp.path());
        let folders = identity_folders(&store, &FsLister);
        assert_eq!(folders, vec![name.to_os_string()]);
        assert!(store.identity_dir(&folders[0]).is_dir());
    }
}
