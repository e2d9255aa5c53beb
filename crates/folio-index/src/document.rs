//! Input documents, doc-page identifiers and write reports.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use tantivy::TantivyDocument;

use crate::schema::IndexSchema;

/// A paginated source document as produced by text extraction.
///
/// Deserializes from the page-text JSON format:
/// `{"filename": "a.pdf", "pages": {"0": "first page", "1": "second page"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique, case-sensitive document name.
    pub filename: String,
    /// Page text keyed by zero-based page number.
    pub pages: BTreeMap<i64, String>,
}

impl Document {
    /// Creates a document with no pages.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            pages: BTreeMap::new(),
        }
    }

    /// Adds a page, replacing any page with the same number.
    pub fn with_page(mut self, page_num: i64, text: impl Into<String>) -> Self {
        self.pages.insert(page_num, text.into());
        self
    }

    /// Splits pages into indexable ones and those that must be skipped.
    pub(crate) fn checked_pages(&self) -> (Vec<(u64, &str)>, Vec<MalformedPage>) {
        let mut valid = Vec::with_capacity(self.pages.len());
        let mut skipped = Vec::new();
        let blank_name = self.filename.trim().is_empty();

        for (&page, text) in &self.pages {
            if blank_name {
                skipped.push(MalformedPage::EmptyFilename { page });
                continue;
            }
            match u64::try_from(page) {
                Ok(page_num) => valid.push((page_num, text.as_str())),
                Err(_) => skipped.push(MalformedPage::NegativePageNumber { page }),
            }
        }

        (valid, skipped)
    }
}

/// Identifier of one indexed page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPageId {
    /// Owning document.
    pub filename: String,
    /// Zero-based page number.
    pub page_num: u64,
}

impl DocPageId {
    /// Creates a doc-page identifier.
    pub fn new(filename: impl Into<String>, page_num: u64) -> Self {
        Self {
            filename: filename.into(),
            page_num,
        }
    }

    /// Builds the Tantivy document stored for this page.
    pub(crate) fn to_tantivy(&self, schema: &IndexSchema, text: &str) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        doc.add_text(schema.doc_id, self.to_string());
        doc.add_text(schema.filename, &self.filename);
        doc.add_text(schema.filename_key, &self.filename);
        doc.add_u64(schema.page_num, self.page_num);
        doc.add_text(schema.content, text);
        doc
    }
}

impl fmt::Display for DocPageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.page_num)
    }
}

/// Why a page was left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MalformedPage {
    /// Page numbers are zero-based; negative numbers cannot be stored.
    NegativePageNumber {
        /// The rejected page number.
        page: i64,
    },
    /// The owning document has an empty filename.
    EmptyFilename {
        /// The rejected page number.
        page: i64,
    },
}

impl fmt::Display for MalformedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativePageNumber { page } => write!(f, "page {page}: negative page number"),
            Self::EmptyFilename { page } => write!(f, "page {page}: document has no filename"),
        }
    }
}

/// Outcome of indexing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// The document's filename.
    pub filename: String,
    /// Number of pages staged for indexing.
    pub indexed: usize,
    /// Pages that were skipped, with reasons.
    pub skipped: Vec<MalformedPage>,
}

/// Outcome of an `add_documents` batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// One report per input document, in input order.
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Total pages staged across the batch.
    pub fn pages_indexed(&self) -> usize {
        self.documents.iter().map(|d| d.indexed).sum()
    }

    /// Total pages skipped across the batch.
    pub fn pages_skipped(&self) -> usize {
        self.documents.iter().map(|d| d.skipped.len()).sum()
    }
}
