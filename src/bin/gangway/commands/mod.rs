//! Command implementations.

pub mod check;
pub mod completions;
pub mod generate;

use std::path::PathBuf;

use anyhow::{bail, Result};

/// Expand header arguments (paths or glob patterns) to concrete files.
pub fn expand_header_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.push(path);
                        matched = true;
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
        if !matched {
            bail!("no header files match `{}`", pattern);
        }
    }

    Ok(files)
}
