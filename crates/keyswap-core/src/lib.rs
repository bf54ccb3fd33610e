//! keyswap-core: identity store for SSH key-pairs.
//!
//! Each identity is a `_<name>` folder under `~/.ssh`. Activating an
//! identity copies its files over the loose keys in `~/.ssh`. This crate
//! provides the store layout, folder listing, active-identity detection,
//! switching, folder name normalization and key-pair generation through an
//! external program. All operations take the store root explicitly.

pub mod detect;
pub mod error;
pub mod keygen;
pub mod listing;
pub mod naming;
pub mod store;
pub mod switch;

// Re-export commonly used items at crate root.
pub use detect::{detect_active, files_identical, ActiveIdentity, UNKNOWN_IDENTITY};
pub use error::{KeyswapError, KeyswapResult};
pub use keygen::{
    default_comment, default_key_name, ensure_identity_dir, keygen_args, local_hostname,
    owner_name, ExitOutcome, Keygen, KeygenDefaults, KeygenRequest, ProcessRunner, SystemRunner,
    DEFAULT_CIPHER, DEFAULT_KEYGEN_PROGRAM,
};
pub use listing::{identity_folders, DirEntryInfo, DirLister, FsLister, StaticLister};
pub use naming::{identity_folder_name, to_snake_case};
pub use store::{Store, DEFAULT_STEMS, IDENTITY_PREFIX, PUBLIC_SUFFIX};
pub use switch::{
    copy_key_file, parse_selection, remove_active_keys, switch_to, CopiedFile, SwitchReport,
};
