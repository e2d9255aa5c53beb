//! Configuration file discovery.
//!
//! Finds the nearest `folio.toml` by walking up the directory tree from a starting point.

use std::path::{Path, PathBuf};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "folio.toml";

/// Finds the configuration file closest to `cwd`.
///
/// Walks up from `cwd` to the filesystem root and returns the first `folio.toml` found.
/// Unlike layered configuration systems, only the nearest file applies.
pub fn discover_config_file(cwd: &Path) -> Option<PathBuf> {
    cwd.ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}
