//! Query parsing and AST for folio search.
//!
//! The query language covers what people type into a document search box:
//!
//! - **Terms**: `fox` - words that must appear (adjacent terms are ANDed)
//! - **Phrases**: `"quick brown fox"` - exact sequences
//! - **OR**: `fox OR dog` - alternatives
//! - **Grouping**: `(fox dog) OR cat` - precedence control
//! - **Fields**: `filename:report` - search a single field
//!
//! Parsing produces a syntax-level [`QueryExpr`]. Resolving field names and
//! analyzing words into index tokens happens in `folio-index`.
//!
//! # Example
//!
//! ```
//! use folio_query::parse;
//!
//! let expr = parse("filename:report (fox OR dog)").unwrap();
//! assert!(expr.is_some());
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::QueryExpr;
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use parser::parse;
