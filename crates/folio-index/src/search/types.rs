//! Result types shared by retrieval, highlighting and formatting.

use std::ops::Range;

use folio_config::{Config, HighlightSettings};
use serde::Serialize;

/// A matched occurrence of a query token in page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    /// Analyzed form of the matched token.
    pub term: String,
    /// Byte range of the occurrence in the raw content.
    pub range: Range<usize>,
}

impl MatchSpan {
    /// Creates a span.
    pub fn new(term: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            term: term.into(),
            range,
        }
    }
}

/// A page matching a query, before highlighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    /// Owning document.
    pub filename: String,
    /// Zero-based page number.
    #[serde(rename = "page")]
    pub page_num: u64,
    /// Relevance score (higher is better).
    pub score: f32,
    /// Page text exactly as indexed.
    #[serde(rename = "content")]
    pub raw_content: String,
    /// Occurrences of content query tokens in `raw_content`, in text order.
    #[serde(skip)]
    pub matched_spans: Vec<MatchSpan>,
}

/// A hit with its highlight fragment and surrounding context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedHit {
    /// The underlying hit.
    #[serde(flatten)]
    pub hit: Hit,
    /// Best fragment with matches wrapped in highlight delimiters.
    pub highlight: String,
    /// Text preceding the fragment, possibly empty.
    pub context_before: String,
    /// Text following the fragment, possibly empty.
    pub context_after: String,
}

/// One page of formatted search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Results on the requested page.
    pub results: Vec<FormattedHit>,
    /// Number of results across all pages.
    pub total: usize,
    /// Number of distinct filenames across all pages.
    pub file_count: usize,
    /// The page that was returned (1-based).
    pub page: usize,
    /// Number of result pages, at least 1.
    pub pages: usize,
    /// Whether results were grouped by filename.
    pub grouped: bool,
}

impl SearchResponse {
    /// A response with no results.
    pub fn empty(page: usize, grouped: bool) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            file_count: 0,
            page: page.max(1),
            pages: 1,
            grouped,
        }
    }
}

/// Options for a complete search: retrieval, highlighting and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Maximum number of candidate hits to retrieve.
    pub limit: usize,
    /// Requested result page (1-based).
    pub page: usize,
    /// Results per page.
    pub page_size: usize,
    /// Keep only the best page of each file.
    pub grouped: bool,
    /// Fragment and context settings.
    pub highlight: HighlightSettings,
}

impl SearchRequest {
    /// Builds a request for the first page using configured defaults.
    pub fn from_config(config: &Config) -> Self {
        Self {
            limit: config.search.limit,
            page: 1,
            page_size: config.search.page_size,
            grouped: config.search.group_by_file,
            highlight: config.highlight.clone(),
        }
    }

    /// Returns the request for a different result page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let request = SearchRequest::default();
        assert_eq!(request.limit, 1000);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
        assert!(request.grouped);
        assert_eq!(request.highlight.pre_tag, "<em>");
    }

    #[test]
    fn empty_response_clamps_page() {
        let response = SearchResponse::empty(0, false);
        assert_eq!(response.page, 1);
        assert_eq!(response.pages, 1);
        assert_eq!(response.total, 0);
        assert!(!response.grouped);
    }

    #[test]
    fn formatted_hit_serializes_flat() {
        let formatted = FormattedHit {
            hit: Hit {
                filename: "a.pdf".into(),
                page_num: 2,
                score: 1.5,
                raw_content: "the fox".into(),
                matched_spans: vec![MatchSpan::new("fox", 4..7)],
            },
            highlight: "the <em>fox</em>".into(),
            context_before: String::new(),
            context_after: String::new(),
        };

        let value = serde_json::to_value(&formatted).unwrap();
        assert_eq!(value["filename"], "a.pdf");
        assert_eq!(value["page"], 2);
        assert_eq!(value["content"], "the fox");
        assert_eq!(value["highlight"], "the <em>fox</em>");
        assert_eq!(value["context_before"], "");
        assert!(value.get("matched_spans").is_none());
        assert!(value.get("page_num").is_none());
    }
}
