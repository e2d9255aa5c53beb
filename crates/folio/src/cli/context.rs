//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use folio_config::{Config, discover_config_file};
use folio_index::Index;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
    /// Loaded configuration (the defaults if no config file was found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the configuration from `explicit`, or from the nearest `folio.toml`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ExitCode> {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_file(&current_dir_or_failure()?),
        };

        let config = match &config_path {
            Some(path) => Config::load(path).map_err(|e| {
                eprintln!("error: failed to load configuration: {e}");
                ExitCode::FAILURE
            })?,
            None => Config::default(),
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Returns the resolved index directory.
    pub fn index_path(&self) -> Result<PathBuf, ExitCode> {
        self.config.index_directory().map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Opens the index, creating it if needed.
    ///
    /// Prints a notice when previously indexed pages were discarded.
    pub fn open_index(&self) -> Result<Index, ExitCode> {
        let path = self.index_path()?;
        let (index, status) =
            Index::open_or_create(&path, &self.config.index).map_err(|e| {
                eprintln!("error: failed to open index at {}: {e}", path.display());
                ExitCode::FAILURE
            })?;

        if status.needs_reindex() {
            eprintln!("note: index {}; re-run `folio index`", status.description());
        }
        Ok(index)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
