//! Staging and committing changes.

use tantivy::{IndexWriter as TantivyIndexWriter, Opstamp, TantivyError, Term};
use tracing::{debug, info, warn};

use super::Index;
use crate::{
    IndexError,
    document::{BatchReport, DocPageId, Document, DocumentReport},
};

impl Index {
    /// Stages every valid page of every document.
    ///
    /// Each document replaces any pages already indexed under its filename. Malformed pages
    /// are skipped, logged, and listed in the report; they never abort the batch. Nothing
    /// is visible to searches until [`Index::commit`].
    ///
    /// If Tantivy rejects a page, every uncommitted operation is rolled back, including
    /// ones staged by earlier calls, so a half-staged batch can never be committed.
    pub fn add_documents(&self, documents: &[Document]) -> Result<BatchReport, IndexError> {
        self.with_writer(|writer| {
            let mut report = BatchReport::default();

            for document in documents {
                let (pages, skipped) = document.checked_pages();
                for reason in &skipped {
                    warn!(filename = %document.filename, %reason, "skipping malformed page");
                }

                if !document.filename.trim().is_empty() {
                    writer.delete_term(self.filename_term(&document.filename));
                }

                let mut indexed = 0;
                for (page_num, text) in pages {
                    let id = DocPageId::new(&document.filename, page_num);
                    if let Err(err) = writer.add_document(id.to_tantivy(&self.schema, text)) {
                        return Err(abort_batch(writer, &err));
                    }
                    indexed += 1;
                }

                debug!(filename = %document.filename, pages = indexed, "staged document");
                report.documents.push(DocumentReport {
                    filename: document.filename.clone(),
                    indexed,
                    skipped,
                });
            }

            Ok(report)
        })
    }

    /// Stages deletion of every page of `filename`.
    pub fn delete_by_filename(&self, filename: &str) -> Result<(), IndexError> {
        self.with_writer(|writer| {
            writer.delete_term(self.filename_term(filename));
            debug!(filename, "staged delete");
            Ok(())
        })
    }

    /// Atomically publishes all staged adds and deletes.
    ///
    /// Searchers that started earlier keep their snapshot. On failure the previous
    /// snapshot stays current and the error is retryable.
    pub fn commit(&self) -> Result<Opstamp, IndexError> {
        let opstamp = self.with_writer(|writer| {
            writer.commit().map_err(|e| {
                warn!(error = %e, "commit failed; keeping previous snapshot");
                IndexError::commit(&e)
            })
        })?;

        self.reader.reload().map_err(|e| IndexError::read(&e))?;
        info!(opstamp, pages = self.num_pages(), "committed");
        Ok(opstamp)
    }

    /// Discards all staged, uncommitted operations.
    pub fn rollback(&self) -> Result<Opstamp, IndexError> {
        self.with_writer(|writer| writer.rollback().map_err(|e| IndexError::write(&e)))
    }

    /// Removes a document: deletes all of its pages and commits.
    pub fn remove_document(&self, filename: &str) -> Result<(), IndexError> {
        self.delete_by_filename(filename)?;
        self.commit()?;
        Ok(())
    }

    /// Runs `f` with exclusive access to the writer.
    fn with_writer<T>(
        &self,
        f: impl FnOnce(&mut TantivyIndexWriter) -> Result<T, IndexError>,
    ) -> Result<T, IndexError> {
        let mut guard = self.writer.lock();
        let writer = guard.as_mut().ok_or_else(IndexError::writer_gone)?;
        f(writer)
    }

    /// Returns the exact-match delete term for a filename.
    fn filename_term(&self, filename: &str) -> Term {
        Term::from_field_text(self.schema.filename_key, filename)
    }
}

/// Discards everything staged after an add failed, returning the retryable error.
fn abort_batch(writer: &mut TantivyIndexWriter, err: &TantivyError) -> IndexError {
    warn!(error = %err, "add failed; rolling back staged changes");
    if let Err(rollback_err) = writer.rollback() {
        warn!(error = %rollback_err, "rollback after failed add also failed");
    }
    IndexError::write(err)
}
