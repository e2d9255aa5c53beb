//! Opening, recovering and rebuilding the index directory.

use std::{fs, path::Path};

use folio_config::IndexSettings;
use parking_lot::Mutex;
use serde::Serialize;
use tantivy::{
    Index as TantivyIndex, IndexReader, ReloadPolicy, TantivyError,
    directory::{MmapDirectory, error::OpenReadError},
};
use tracing::{info, warn};

use super::Index;
use crate::{
    IndexError,
    analyzer::Analyzers,
    fingerprint::{AnalysisSettings, read_fingerprint, write_fingerprint},
    schema::IndexSchema,
};

/// Marker file of an existing Tantivy index.
const META_FILE: &str = "meta.json";

/// What [`Index::open_or_create`] found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OpenStatus {
    /// No index existed; an empty one was created.
    Created,
    /// An existing index was opened as is.
    Opened,
    /// The index was built with different analysis settings and has been emptied.
    SettingsChanged,
    /// The index was unreadable and has been replaced with an empty one.
    Recovered {
        /// Why the old index could not be opened.
        reason: String,
    },
}

impl OpenStatus {
    /// Returns a short description for display.
    pub fn description(&self) -> String {
        match self {
            Self::Created => "created".to_string(),
            Self::Opened => "opened".to_string(),
            Self::SettingsChanged => "emptied (analysis settings changed)".to_string(),
            Self::Recovered { reason } => format!("recovered empty (was corrupt: {reason})"),
        }
    }

    /// Returns true if previously indexed pages are gone and need re-indexing.
    pub fn needs_reindex(&self) -> bool {
        matches!(self, Self::SettingsChanged | Self::Recovered { .. })
    }
}

impl Index {
    /// Opens the index at `path`, creating it if it doesn't exist.
    ///
    /// An index written with different analysis settings is emptied, and an unreadable
    /// index is replaced with an empty one; both are logged and reported through the
    /// returned [`OpenStatus`]. Fails if the language is unknown, the directory cannot be
    /// used, or another handle holds the writer lock.
    pub fn open_or_create(
        path: &Path,
        settings: &IndexSettings,
    ) -> Result<(Self, OpenStatus), IndexError> {
        let analyzers = Analyzers::new(&settings.language, settings.stop_words)?;
        let fingerprint = AnalysisSettings::from_settings(settings).fingerprint();
        let schema = IndexSchema::new();

        fs::create_dir_all(path)?;
        let existed = path.join(META_FILE).exists();
        let stored = read_fingerprint(path)?;

        let (index, reader, status) = match open_storage(path, &schema, &analyzers) {
            Ok((index, reader)) if !existed => (index, reader, OpenStatus::Created),
            Ok((index, reader)) if stored.as_deref() == Some(fingerprint.as_str()) => {
                (index, reader, OpenStatus::Opened)
            }
            Ok((index, reader)) => (index, reader, OpenStatus::SettingsChanged),
            Err(err) if existed && is_corrupt(&err) => {
                let reason = err.to_string();
                warn!(
                    path = %path.display(),
                    error = %reason,
                    "index is unreadable; replacing it with an empty index"
                );
                wipe(path)?;
                let (index, reader) =
                    open_storage(path, &schema, &analyzers).map_err(|e| IndexError::Corrupt {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                (index, reader, OpenStatus::Recovered { reason })
            }
            Err(err) => return Err(IndexError::open(&err)),
        };

        let mut writer = index
            .writer(settings.writer_heap_bytes)
            .map_err(|e| IndexError::open(&e))?;

        if status == OpenStatus::SettingsChanged {
            warn!(
                path = %path.display(),
                "analysis settings changed since the index was built; emptying it"
            );
            writer
                .delete_all_documents()
                .map_err(|e| IndexError::write(&e))?;
            writer.commit().map_err(|e| IndexError::commit(&e))?;
            reader.reload().map_err(|e| IndexError::read(&e))?;
        }

        if status != OpenStatus::Opened {
            write_fingerprint(path, &fingerprint)?;
        }

        info!(
            path = %path.display(),
            status = %status.description(),
            pages = reader.searcher().num_docs(),
            "index ready"
        );

        let index = Self {
            path: path.to_path_buf(),
            reader,
            writer: Mutex::new(Some(writer)),
            schema,
            analyzers,
            fingerprint,
            writer_heap_bytes: settings.writer_heap_bytes,
        };

        Ok((index, status))
    }

    /// Drops the on-disk index and recreates it empty.
    ///
    /// Pending operations are discarded. If recreation fails the handle has no writer
    /// until `rebuild` succeeds.
    pub fn rebuild(&mut self) -> Result<(), IndexError> {
        // Dropping the writer joins its threads and releases the directory lock.
        drop(self.writer.get_mut().take());

        wipe(&self.path)?;
        let (index, reader) = open_storage(&self.path, &self.schema, &self.analyzers)
            .map_err(|e| IndexError::open(&e))?;
        let writer = index
            .writer(self.writer_heap_bytes)
            .map_err(|e| IndexError::open(&e))?;
        write_fingerprint(&self.path, &self.fingerprint)?;

        self.reader = reader;
        *self.writer.get_mut() = Some(writer);

        info!(path = %self.path.display(), "index rebuilt");
        Ok(())
    }
}

/// Opens or creates the Tantivy index and a manually reloaded reader.
fn open_storage(
    path: &Path,
    schema: &IndexSchema,
    analyzers: &Analyzers,
) -> Result<(TantivyIndex, IndexReader), TantivyError> {
    let dir = MmapDirectory::open(path)?;
    let index = TantivyIndex::open_or_create(dir, schema.schema().clone())?;
    analyzers.register(&index);

    let reader = index
        .reader_builder()
        .reload_policy(ReloadPolicy::Manual)
        .try_into()?;

    Ok((index, reader))
}

/// Returns true if `err` means the stored index can never be opened as is.
///
/// I/O, directory and lock failures are not corruption: they may clear up on retry, and
/// the data on disk must be kept.
fn is_corrupt(err: &TantivyError) -> bool {
    matches!(
        err,
        TantivyError::DataCorruption(_)
            | TantivyError::IncompatibleIndex(_)
            | TantivyError::SchemaError(_)
            | TantivyError::OpenReadError(
                OpenReadError::FileDoesNotExist(_) | OpenReadError::IncompatibleIndex(_)
            )
    )
}

/// Removes everything in the index directory, leaving it empty.
fn wipe(path: &Path) -> Result<(), IndexError> {
    fs::remove_dir_all(path)?;
    fs::create_dir_all(path)?;
    Ok(())
}
