//! Configuration file support.
//!
//! A project may carry a `gangway.toml` next to the headers it generates
//! from. Values there act as defaults; command-line flags always win.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = "gangway.toml";

/// Gangway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,
}

/// Settings for the `generate` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Adapter symbol prefix (overrides the `gw_<stem>` default)
    pub prefix: Option<String>,

    /// Library name used to derive the default prefix
    pub lib_name: Option<String>,

    /// Output directory for generated sources
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load `gangway.toml` from a directory, or return defaults if absent.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
