//! The page index handle.
//!
//! An [`Index`] owns one index directory. Searches run against the last committed
//! snapshot and never wait for the writer; writes are staged through a single writer and
//! become visible together on [`Index::commit`].

mod open;
mod search;
mod write;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

pub use open::OpenStatus;
use parking_lot::Mutex;
use tantivy::{
    IndexReader, IndexWriter as TantivyIndexWriter, TantivyDocument,
    collector::DocSetCollector, query::AllQuery, schema::Value,
};

use crate::{IndexError, analyzer::Analyzers, schema::IndexSchema};

/// A persistent, searchable index of document pages.
///
/// `Index` is `Send + Sync`; share it behind an `Arc` to search from many threads while
/// one thread writes.
#[allow(clippy::multiple_inherent_impl)]
pub struct Index {
    /// Index directory.
    path: PathBuf,
    /// Reader reloaded after every successful commit.
    reader: IndexReader,
    /// The single writer; `None` after a failed rebuild.
    writer: Mutex<Option<TantivyIndexWriter>>,
    /// Schema with field handles.
    schema: IndexSchema,
    /// Analyzers registered with the index.
    analyzers: Analyzers,
    /// Fingerprint of the analysis settings this index was opened with.
    fingerprint: String,
    /// Writer memory budget in bytes.
    writer_heap_bytes: usize,
}

impl Index {
    /// Returns the index directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the analyzers this index uses for content and filenames.
    pub fn analyzers(&self) -> &Analyzers {
        &self.analyzers
    }

    /// Returns the number of committed pages.
    pub fn num_pages(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Returns the distinct filenames in the committed snapshot, sorted.
    pub fn filenames(&self) -> Result<Vec<String>, IndexError> {
        let searcher = self.reader.searcher();
        let addresses = searcher
            .search(&AllQuery, &DocSetCollector)
            .map_err(|e| IndexError::read(&e))?;

        let mut names = BTreeSet::new();
        for address in addresses {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::read(&e))?;
            if let Some(name) = doc.get_first(self.schema.filename).and_then(|v| v.as_str()) {
                names.insert(name.to_string());
            }
        }

        Ok(names.into_iter().collect())
    }

    /// Waits for background merges and releases the writer lock.
    ///
    /// Uncommitted operations are discarded.
    pub fn close(self) -> Result<(), IndexError> {
        if let Some(writer) = self.writer.into_inner() {
            writer
                .wait_merging_threads()
                .map_err(|e| IndexError::write(&e))?;
        }
        Ok(())
    }
}
