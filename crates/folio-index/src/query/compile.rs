//! Query compiler.
//!
//! Compiles an analyzed [`QueryTree`] into Tantivy queries.

use tantivy::{
    Term,
    query::{BooleanQuery, EmptyQuery, Occur, PhraseQuery, Query, TermQuery},
    schema::IndexRecordOption,
};

use super::QueryTree;
use crate::schema::IndexSchema;

/// Compiles a query tree into a Tantivy query.
///
/// And children become `Must` clauses and Or children `Should` clauses, so BM25 scores of
/// matching children add up. Single-token phrases compile to term queries and empty
/// phrases match nothing.
pub fn compile(tree: &QueryTree, schema: &IndexSchema) -> Box<dyn Query> {
    match tree {
        QueryTree::Term { field, token } => {
            let term = Term::from_field_text(schema.field(*field), token);
            Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs))
        }
        QueryTree::Phrase { field, tokens } => {
            let field = schema.field(*field);
            match tokens.as_slice() {
                [] => return Box::new(EmptyQuery),
                [(_, token)] => {
                    let term = Term::from_field_text(field, token);
                    return Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
                }
                _ => {}
            }
            let terms: Vec<(usize, Term)> = tokens
                .iter()
                .map(|(offset, token)| (*offset, Term::from_field_text(field, token)))
                .collect();
            Box::new(PhraseQuery::new_with_offset(terms))
        }
        QueryTree::And(children) => boolean(children, Occur::Must, schema),
        QueryTree::Or(children) => boolean(children, Occur::Should, schema),
    }
}

/// Builds a boolean query with every child under the same occurrence.
fn boolean(children: &[QueryTree], occur: Occur, schema: &IndexSchema) -> Box<dyn Query> {
    let clauses: Vec<(Occur, Box<dyn Query>)> = children
        .iter()
        .map(|child| (occur, compile(child, schema)))
        .collect();
    Box::new(BooleanQuery::new(clauses))
}
