//! Query execution against the committed snapshot.

use folio_query::QueryError;
use tantivy::{
    DocAddress, Score, Searcher, TantivyDocument,
    collector::TopDocs,
    query::Query,
    schema::{Field, Value},
};
use tracing::{debug, warn};

use super::Index;
use crate::{
    IndexError,
    format::format,
    query::{QueryTree, QueryTreeBuilder, compile},
    schema::SearchField,
    search::{Hit, SearchRequest, SearchResponse, matched_spans},
};

impl Index {
    /// Parses and resolves a query string against this index's fields and analyzers.
    ///
    /// Returns `Ok(None)` for queries that contain no searchable tokens.
    pub fn parse_query(&self, query: &str) -> Result<Option<QueryTree>, QueryError> {
        let Some(expr) = folio_query::parse(query)? else {
            return Ok(None);
        };
        QueryTreeBuilder::new(&self.analyzers)
            .build(&expr)
            .map_err(|e| e.with_query(query))
    }

    /// Evaluates a query tree, returning up to `limit` hits.
    ///
    /// Hits are ordered by score descending, then filename and page ascending. An empty
    /// index or a query without matches yields no hits.
    pub fn search_tree(&self, tree: &QueryTree, limit: usize) -> Result<Vec<Hit>, IndexError> {
        let searcher = self.reader.searcher();
        if limit == 0 || searcher.num_docs() == 0 {
            return Ok(Vec::new());
        }

        let query = compile(tree, &self.schema);
        let top_docs = collect_through_ties(&searcher, &*query, limit)?;

        let content_terms = tree.tokens_for(SearchField::Content);
        let analyzer = self.analyzers.for_field(SearchField::Content);

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::read(&e))?;
            let raw_content = text_of(&doc, self.schema.content);
            hits.push(Hit {
                filename: text_of(&doc, self.schema.filename),
                page_num: doc
                    .get_first(self.schema.page_num)
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
                score,
                matched_spans: matched_spans(analyzer, &raw_content, &content_terms),
                raw_content,
            });
        }

        sort_hits(&mut hits);
        hits.truncate(limit);
        debug!(hits = hits.len(), limit, "query executed");
        Ok(hits)
    }

    /// Runs a query string end to end: parse, retrieve, highlight and paginate.
    ///
    /// A query that fails to parse is logged and answered with an empty response; use
    /// [`Index::parse_query`] first to surface the error instead.
    pub fn search(
        &self,
        query: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, IndexError> {
        let tree = match self.parse_query(query) {
            Ok(Some(tree)) => tree,
            Ok(None) => return Ok(SearchResponse::empty(request.page, request.grouped)),
            Err(err) => {
                warn!(query, error = %err.message(), "rejected query; returning no results");
                return Ok(SearchResponse::empty(request.page, request.grouped));
            }
        };

        let hits = self.search_tree(&tree, request.limit)?;
        Ok(format(
            hits,
            request.page,
            request.page_size,
            request.grouped,
            &request.highlight,
        ))
    }
}

/// Collects the top `limit` matches plus every match tied with the last of them.
///
/// Tantivy breaks score ties by document address, so the cut at `limit` is widened until
/// the score drops; [`sort_hits`] then decides which tied hits survive.
fn collect_through_ties(
    searcher: &Searcher,
    query: &dyn Query,
    limit: usize,
) -> Result<Vec<(Score, DocAddress)>, IndexError> {
    let max_wanted = usize::try_from(searcher.num_docs())
        .unwrap_or(usize::MAX)
        .saturating_add(1);
    let mut wanted = limit.saturating_add(1).min(max_wanted);

    loop {
        let mut top = searcher
            .search(query, &TopDocs::with_limit(wanted))
            .map_err(|e| IndexError::read(&e))?;
        if top.len() <= limit {
            return Ok(top);
        }

        let cutoff = top[limit - 1].0;
        let exhausted = top.len() < wanted || wanted == max_wanted;
        if exhausted || top[wanted - 1].0 < cutoff {
            top.retain(|(score, _)| *score >= cutoff);
            return Ok(top);
        }
        wanted = wanted.saturating_mul(2).min(max_wanted);
    }
}

/// Reads the first text value of `field`, or an empty string.
fn text_of(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Orders hits by score descending, then filename and page ascending.
fn sort_hits(hits: &mut [Hit]) {
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.filename.cmp(&b.filename))
            .then_with(|| a.page_num.cmp(&b.page_num))
    });
}
