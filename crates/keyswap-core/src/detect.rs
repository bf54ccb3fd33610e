//! Active-identity detection.
//!
//! An identity folder is active when, for at least one recognized stem,
//! both its private and public key files are byte-identical to the loose
//! files of the same name in the store root. Folders are tried in listing
//! order and the first match wins.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::listing::{identity_folders, DirLister};
use crate::store::{Store, PUBLIC_SUFFIX};

/// Sentinel rendered when no identity folder matches.
pub const UNKNOWN_IDENTITY: &str = "<unknown>";

/// Result of active-identity detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveIdentity {
    Folder(OsString),
    Unknown,
}

impl fmt::Display for ActiveIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveIdentity::Folder(name) => f.write_str(&name.to_string_lossy()),
            ActiveIdentity::Unknown => f.write_str(UNKNOWN_IDENTITY),
        }
    }
}

/// Find the identity folder whose keys are currently active.
pub fn detect_active(store: &Store, lister: &dyn DirLister) -> ActiveIdentity {
    for folder in identity_folders(store, lister) {
        let dir = store.identity_dir(&folder);

        for stem in store.stems() {
            let active_private = store.active_private(stem);
            let active_public = store.active_public(stem);
            let folder_private = dir.join(stem);
            let folder_public = dir.join(format!("{stem}{PUBLIC_SUFFIX}"));

            let all_present = [&active_private, &active_public, &folder_private, &folder_public]
                .iter()
                .all(|p| p.exists());
            if !all_present {
                continue;
            }

            if files_identical(&active_private, &folder_private)
                && files_identical(&active_public, &folder_public)
            {
                debug!(folder = ?folder, stem = %stem, "active identity matched");
                return ActiveIdentity::Folder(folder);
            }
        }
    }

    ActiveIdentity::Unknown
}

/// Byte-compare two files. Unreadable files never compare equal.
pub fn files_identical(a: &Path, b: &Path) -> bool {
    match (fs::read(a), fs::read(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}
