//! Result grouping, ordering and pagination.

use std::collections::HashSet;

use folio_config::HighlightSettings;

use crate::{
    highlight::highlight,
    search::{FormattedHit, Hit, SearchResponse},
};

/// Groups, sorts and paginates score-ordered hits into a response.
///
/// Grouped output keeps the first (best-scoring) hit of each filename; both modes then sort
/// by filename, stably, so pages of one file stay in score order. `page` is 1-based; values
/// below 1 are treated as 1, and a `page_size` of 0 as 1. Pages past the end come back
/// empty with correct totals. Only hits on the returned page are highlighted.
pub fn format(
    hits: Vec<Hit>,
    page: usize,
    page_size: usize,
    grouped: bool,
    settings: &HighlightSettings,
) -> SearchResponse {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let mut hits = if grouped { best_per_file(hits) } else { hits };
    hits.sort_by(|a, b| a.filename.cmp(&b.filename));

    let total = hits.len();
    let file_count = hits
        .iter()
        .map(|h| h.filename.as_str())
        .collect::<HashSet<_>>()
        .len();
    let pages = total.div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    let results = hits
        .drain(start..end)
        .map(|hit| {
            let fragment = highlight(&hit.raw_content, &hit.matched_spans, settings);
            FormattedHit {
                hit,
                highlight: fragment.text,
                context_before: fragment.context_before,
                context_after: fragment.context_after,
            }
        })
        .collect();

    SearchResponse {
        results,
        total,
        file_count,
        page,
        pages,
        grouped,
    }
}

/// Keeps the first hit of each filename, preserving order.
fn best_per_file(hits: Vec<Hit>) -> Vec<Hit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.filename.clone()))
        .collect()
}
