//! Analysis settings fingerprint for index versioning.
//!
//! The index directory holds a hash of every setting that changes how text is turned
//! into tokens. Tokens written under one pipeline never match queries analyzed under
//! another, so a changed fingerprint means the index has to be rebuilt.
//!
//! Settings that affect the fingerprint:
//! - Schema version (internal, bumped when field definitions change)
//! - Stemmer language
//! - Stop-word removal

use std::{
    fs,
    hash::{Hash, Hasher},
    io,
    path::{Path, PathBuf},
};

use folio_config::IndexSettings;
use siphasher::sip::SipHasher24;

/// Current schema version. Bump this when index field definitions change.
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the fingerprint file inside the index directory.
pub const SETTINGS_FILENAME: &str = "folio.settings";

/// Settings that affect analysis and are included in the fingerprint.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Schema version - changes when index structure changes.
    pub schema_version: u32,
    /// Normalized stemmer language.
    pub language: String,
    /// Whether stop words are removed.
    pub stop_words: bool,
}

impl AnalysisSettings {
    /// Extracts analysis-relevant settings from the index configuration.
    pub fn from_settings(settings: &IndexSettings) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            language: settings.language.trim().to_lowercase(),
            stop_words: settings.stop_words,
        }
    }

    /// Computes a hash and returns it as a hex string.
    pub fn fingerprint(&self) -> String {
        let mut hasher = SipHasher24::new();
        self.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

/// Returns the fingerprint file path for an index directory.
pub fn fingerprint_path(index_dir: &Path) -> PathBuf {
    index_dir.join(SETTINGS_FILENAME)
}

/// Reads the stored fingerprint from an index directory.
///
/// Returns `None` if the file doesn't exist. Any other read failure is an error, so a
/// transient I/O problem is never mistaken for changed settings.
pub fn read_fingerprint(index_dir: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(fingerprint_path(index_dir)) {
        Ok(contents) => Ok(Some(contents.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes a fingerprint to an index directory.
pub fn write_fingerprint(index_dir: &Path, fingerprint: &str) -> io::Result<()> {
    fs::write(fingerprint_path(index_dir), fingerprint)
}
