//! Configuration system for folio.
//!
//! folio reads a single TOML file named `folio.toml`. The file is either given explicitly or
//! discovered by walking up the directory tree from the current working directory. Every
//! setting has a default, so a missing file or an empty file yields a working configuration.
//!
//! ```toml
//! [index]
//! language = "english"
//!
//! [search]
//! page_size = 20
//!
//! [highlight]
//! pre_tag = "**"
//! post_tag = "**"
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod location;
mod parse;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_file};
pub use error::ConfigError;
pub use location::resolve_index_path;
pub use parse::{parse_config_file, parse_config_str};
use serde::{Deserialize, Serialize};
pub use validate::MIN_WRITER_HEAP;
use validate::validate_config;

/// Top-level folio configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Index storage and analysis settings.
    pub index: IndexSettings,
    /// Query and result settings.
    pub search: SearchSettings,
    /// Highlight fragment settings.
    pub highlight: HighlightSettings,
    /// Directory containing the config file this was loaded from, if any.
    #[serde(skip)]
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads and validates the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = parse_config_file(path)?;
        config.config_root = path.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Loads the nearest `folio.toml` above `cwd`, or the defaults if there is none.
    pub fn discover(cwd: &Path) -> Result<Self, ConfigError> {
        match discover_config_file(cwd) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Checks that all settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)
    }

    /// Resolves the directory the index lives in.
    pub fn index_directory(&self) -> Result<PathBuf, ConfigError> {
        resolve_index_path(self.index.path.as_deref(), self.config_root.as_deref())
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same shape as a `folio.toml` file, making it easy to see the
    /// effective configuration.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Index storage and analysis settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexSettings {
    /// Index directory. Relative paths resolve against the config file's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Stemming language.
    pub language: String,
    /// Whether common English stop words are removed during analysis.
    pub stop_words: bool,
    /// Memory budget for the index writer, in bytes.
    pub writer_heap_bytes: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: None,
            language: String::from("english"),
            stop_words: true,
            writer_heap_bytes: 50_000_000,
        }
    }
}

/// Query and result settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    /// Maximum number of candidate hits retrieved per query.
    pub limit: usize,
    /// Results per page.
    pub page_size: usize,
    /// Whether results keep only the best page of each file.
    pub group_by_file: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: 1000,
            page_size: 10,
            group_by_file: true,
        }
    }
}

/// Highlight fragment settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightSettings {
    /// Fragment window size in characters.
    pub fragment_chars: usize,
    /// Maximum context size on each side of the fragment, in characters.
    pub context_chars: usize,
    /// Marker inserted before each highlighted occurrence.
    pub pre_tag: String,
    /// Marker inserted after each highlighted occurrence.
    pub post_tag: String,
    /// Marker for truncated context.
    pub ellipsis: String,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            fragment_chars: 100,
            context_chars: 150,
            pre_tag: String::from("<em>"),
            post_tag: String::from("</em>"),
            ellipsis: String::from("..."),
        }
    }
}
