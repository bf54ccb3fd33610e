//! Layout of the identity store.
//!
//! The store root (normally `~/.ssh`) holds the loose "active" key files
//! and one `_<name>` subfolder per identity:
//!
//! ```text
//! ~/.ssh/
//!   id_ed25519          <- active private key
//!   id_ed25519.pub      <- active public key
//!   _work/
//!     id_ed25519
//!     id_ed25519.pub
//!   _personal/
//!     id_rsa
//!     id_rsa.pub
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{KeyswapError, KeyswapResult};

/// Prefix that marks a subfolder of the root as an identity folder.
pub const IDENTITY_PREFIX: &str = "_";

/// Suffix of the public half of a key pair.
pub const PUBLIC_SUFFIX: &str = ".pub";

/// Recognized active key stems, in detection priority order.
pub const DEFAULT_STEMS: [&str; 3] = ["id_docker", "id_ed25519", "id_rsa"];

/// A directory of identity folders plus the active key files.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    stems: Vec<String>,
}

impl Store {
    /// Create a store rooted at `root` with the default recognized stems.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_stems(root, DEFAULT_STEMS.iter().map(|s| s.to_string()).collect())
    }

    /// Create a store with a custom list of recognized stems.
    pub fn with_stems(root: impl Into<PathBuf>, stems: Vec<String>) -> Self {
        Self {
            root: root.into(),
            stems,
        }
    }

    /// Create a store at the default location (`~/.ssh`).
    pub fn default_location() -> KeyswapResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| KeyswapError::Other("cannot determine home directory".into()))?;
        Ok(Self::new(home.join(".ssh")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    /// Path of the active private key for `stem`.
    pub fn active_private(&self, stem: &str) -> PathBuf {
        self.root.join(stem)
    }

    /// Path of the active public key for `stem`.
    pub fn active_public(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{stem}{PUBLIC_SUFFIX}"))
    }

    /// Path of the identity folder called `name`.
    pub fn identity_dir(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// Every recognized active file name: private then public, per stem.
    pub fn active_file_names(&self) -> Vec<String> {
        self.stems
            .iter()
            .flat_map(|stem| [stem.clone(), format!("{stem}{PUBLIC_SUFFIX}")])
            .collect()
    }
}

/// Whether a directory name denotes an identity folder.
///
/// Names need not be valid UTF-8; only the leading prefix is checked.
pub fn is_identity_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(IDENTITY_PREFIX.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stems_in_priority_order() {
        let store = Store::new("/tmp/ssh");
        assert_eq!(store.stems(), &["id_docker", "id_ed25519", "id_rsa"]);
    }

    #[test]
    fn six_active_file_names() {
        let store = Store::new("/tmp/ssh");
        assert_eq!(
            store.active_file_names(),
            vec![
                "id_docker",
                "id_docker.pub",
                "id_ed25519",
                "id_ed25519.pub",
                "id_rsa",
                "id_rsa.pub",
            ]
        );
    }

    #[test]
    fn key_paths_live_in_root() {
        let store = Store::new("/tmp/ssh");
        assert_eq!(store.active_private("id_rsa"), Path::new("/tmp/ssh/id_rsa"));
        assert_eq!(
            store.active_public("id_rsa"),
            Path::new("/tmp/ssh/id_rsa.pub")
        );
        assert_eq!(store.identity_dir("_work"), Path::new("/tmp/ssh/_work"));
    }

    #[test]
    fn identity_names_need_underscore() {
        assert!(is_identity_name(OsStr::new("_work")));
        assert!(is_identity_name(OsStr::new("_")));
        assert!(!is_identity_name(OsStr::new("work")));
        assert!(!is_identity_name(OsStr::new("config")));
    }
}
