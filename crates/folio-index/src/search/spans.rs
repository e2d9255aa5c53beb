//! Locating query-token occurrences in raw page text.

use std::collections::HashSet;

use tantivy::tokenizer::TextAnalyzer;

use super::MatchSpan;
use crate::analyzer::analyze;

/// Finds every token of `content` whose analyzed form is in `terms`.
///
/// Offsets are byte ranges into `content`, in text order. Since `content` is analyzed with
/// the same pipeline as the query, "Running" matches a query for "runs".
pub fn matched_spans(
    analyzer: &TextAnalyzer,
    content: &str,
    terms: &HashSet<String>,
) -> Vec<MatchSpan> {
    if terms.is_empty() || content.is_empty() {
        return Vec::new();
    }

    analyze(analyzer, content)
        .into_iter()
        .filter(|token| terms.contains(&token.text))
        .map(|token| MatchSpan::new(token.text, token.offset))
        .collect()
}
