//! Optional configuration at `~/.keyswap/config.toml`.
//!
//! Every setting has a default matching the stock behavior, so the file
//! only needs the keys being changed. CLI flags override config values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyswap_core::{DEFAULT_CIPHER, DEFAULT_KEYGEN_PROGRAM, DEFAULT_STEMS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub keygen: KeygenConfig,
}

/// Identity store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store root. Defaults to `~/.ssh`.
    #[serde(default)]
    pub ssh_dir: Option<PathBuf>,

    /// Recognized active key stems, in detection priority order.
    #[serde(default = "default_stems")]
    pub stems: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ssh_dir: None,
            stems: default_stems(),
        }
    }
}

/// Key generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeygenConfig {
    /// Program invoked to create key pairs.
    #[serde(default = "default_program")]
    pub program: String,

    /// Cipher used when the prompt is left blank.
    #[serde(default = "default_cipher")]
    pub default_cipher: String,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            default_cipher: default_cipher(),
        }
    }
}

fn default_stems() -> Vec<String> {
    DEFAULT_STEMS.iter().map(|s| s.to_string()).collect()
}

fn default_program() -> String {
    DEFAULT_KEYGEN_PROGRAM.to_string()
}

fn default_cipher() -> String {
    DEFAULT_CIPHER.to_string()
}

impl Config {
    /// Load configuration from a TOML file, returning defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
