//! Query resolution and compilation.
//!
//! Turns the syntax tree from `folio-query` into an analyzed [`QueryTree`], then into a
//! Tantivy query.

mod compile;
mod tree;

pub use compile::compile;
pub use tree::{QueryTree, QueryTreeBuilder};
