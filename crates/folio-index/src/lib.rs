//! Tantivy-based page index for folio.
//!
//! This crate is the search core of folio. It handles:
//! - Text analysis with configurable stemming and stop words
//! - Index creation, corruption recovery, writing and committing
//! - Query resolution from the `folio-query` syntax tree to analyzed query trees
//! - Ranked retrieval over page content and filenames
//! - Highlight fragment selection with surrounding context
//! - Grouping by file and pagination of results
//!
//! # Example
//!
//! ```no_run
//! use folio_config::IndexSettings;
//! use folio_index::{Document, Index, SearchRequest};
//!
//! let (index, _status) = Index::open_or_create("./index".as_ref(), &IndexSettings::default())?;
//!
//! index.add_documents(&[Document::new("a.pdf").with_page(0, "The quick brown fox")])?;
//! index.commit()?;
//!
//! let response = index.search("fox", &SearchRequest::default())?;
//! for result in &response.results {
//!     println!("{} p{}: {}", result.hit.filename, result.hit.page_num, result.highlight);
//! }
//! # Ok::<(), folio_index::IndexError>(())
//! ```

#![warn(missing_docs)]

mod analyzer;
mod document;
mod error;
mod fingerprint;
mod format;
mod highlight;
mod query;
mod schema;
mod search;
mod store;

pub use analyzer::{
    AnalyzedToken, Analyzers, CONTENT_TOKENIZER, FILENAME_TOKENIZER, STOP_WORDS, analyze,
    parse_language,
};
pub use document::{BatchReport, DocPageId, Document, DocumentReport, MalformedPage};
pub use error::IndexError;
pub use fingerprint::{AnalysisSettings, SCHEMA_VERSION, SETTINGS_FILENAME};
pub use format::format;
pub use highlight::{Fragment, highlight};
pub use query::{QueryTree, QueryTreeBuilder};
pub use schema::{IndexSchema, SearchField};
pub use search::{FormattedHit, Hit, MatchSpan, SearchRequest, SearchResponse};
pub use store::{Index, OpenStatus};
