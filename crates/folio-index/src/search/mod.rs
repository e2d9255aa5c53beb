//! Retrieval result types and match-span extraction.

mod spans;
mod types;

pub use spans::matched_spans;
pub use types::{FormattedHit, Hit, MatchSpan, SearchRequest, SearchResponse};
