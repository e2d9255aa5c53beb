//! Index schema definition for the folio page index.
//!
//! One Tantivy document is stored per doc-page:
//! - `doc_id`: composite `{filename}:{page_num}` identifier (raw string, stored)
//! - `filename`: source filename (filename analyzer, stored)
//! - `filename_key`: exact filename (raw string, used for deletes)
//! - `page_num`: zero-based page number (stored only)
//! - `content`: page text (content analyzer with positions, stored)

use std::fmt;

use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions,
};

use crate::analyzer::{CONTENT_TOKENIZER, FILENAME_TOKENIZER};

/// A user-searchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Page text.
    Content,
    /// Source filename.
    Filename,
}

impl SearchField {
    /// Fields searched by unqualified query terms.
    pub const DEFAULT: [Self; 2] = [Self::Content, Self::Filename];

    /// Returns the field name used in queries.
    pub fn name(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Filename => "filename",
        }
    }

    /// Resolves a field name from a query. Names are case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::DEFAULT
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Composite doc-page identifier: `{filename}:{page_num}`.
    pub doc_id: Field,
    /// Source filename, tokenized for search.
    pub filename: Field,
    /// Source filename as a single term, for exact deletion.
    pub filename_key: Field,
    /// Zero-based page number.
    pub page_num: Field,
    /// Page text.
    pub content: Field,
}

impl IndexSchema {
    /// Creates a new index schema with all fields configured.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let doc_id = builder.add_text_field("doc_id", STRING | STORED);

        // Positions on filenames too, so quoted filename phrases work
        let filename_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(FILENAME_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        let filename = builder.add_text_field("filename", filename_options);

        let filename_key = builder.add_text_field("filename_key", STRING);

        let page_num = builder.add_u64_field("page_num", STORED);

        let content_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(CONTENT_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        let content = builder.add_text_field("content", content_options);

        let schema = builder.build();

        Self {
            schema,
            doc_id,
            filename,
            filename_key,
            page_num,
            content,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the Tantivy field backing a searchable field.
    pub fn field(&self, field: SearchField) -> Field {
        match field {
            SearchField::Content => self.content,
            SearchField::Filename => self.filename,
        }
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}
