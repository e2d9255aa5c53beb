//! Index location resolution.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Directory created next to a config file to hold its index.
const LOCAL_INDEX_DIR: &str = ".folio";

/// Application directory name under the platform data directory.
const APP_DIR: &str = "folio";

/// Resolves where the index for a configuration lives.
///
/// - An explicit `configured` path has its tilde expanded, and is joined onto `config_root`
///   when relative (or left relative to the working directory when there is no config file).
/// - Otherwise, with a config file present, the index lives at `<config_root>/.folio/index`.
/// - Otherwise the platform data directory is used (e.g. `~/.local/share/folio/index`).
pub fn resolve_index_path(
    configured: Option<&Path>,
    config_root: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = configured {
        let expanded = expand_tilde(path)?;
        return Ok(match config_root {
            Some(root) if expanded.is_relative() => root.join(expanded),
            _ => expanded,
        });
    }

    if let Some(root) = config_root {
        return Ok(root.join(LOCAL_INDEX_DIR).join("index"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.data_dir().join(APP_DIR).join("index"))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Expands a leading `~` component to the home directory.
fn expand_tilde(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home_dir()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
