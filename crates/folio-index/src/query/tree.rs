//! Analyzed query trees.

use std::{collections::HashSet, fmt};

use folio_query::{QueryError, QueryExpr};

use crate::{analyzer::Analyzers, schema::SearchField};

/// A query over analyzed index tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTree {
    /// A single token in one field.
    Term {
        /// Field to search.
        field: SearchField,
        /// Analyzed token.
        token: String,
    },
    /// Tokens at fixed relative positions in one field.
    Phrase {
        /// Field to search.
        field: SearchField,
        /// `(relative position, token)` pairs; gaps mark removed stop words.
        tokens: Vec<(usize, String)>,
    },
    /// Every child must match.
    And(Vec<Self>),
    /// At least one child must match; matching children add to the score.
    Or(Vec<Self>),
}

impl QueryTree {
    /// Builds an And, unwrapping a single child. Returns `None` for no children.
    fn and(mut children: Vec<Self>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Self::And(children)),
        }
    }

    /// Builds an Or, unwrapping a single child. Returns `None` for no children.
    fn or(mut children: Vec<Self>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Self::Or(children)),
        }
    }

    /// Returns every token this tree searches for in `field`.
    pub fn tokens_for(&self, field: SearchField) -> HashSet<String> {
        let mut out = HashSet::new();
        self.collect_tokens(field, &mut out);
        out
    }

    /// Recursive helper for [`Self::tokens_for`].
    fn collect_tokens(&self, wanted: SearchField, out: &mut HashSet<String>) {
        match self {
            Self::Term { field, token } if *field == wanted => {
                out.insert(token.clone());
            }
            Self::Phrase { field, tokens } if *field == wanted => {
                out.extend(tokens.iter().map(|(_, t)| t.clone()));
            }
            Self::Term { .. } | Self::Phrase { .. } => {}
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_tokens(wanted, out);
                }
            }
        }
    }

    /// Formats the tree with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term { field, token } => writeln!(f, "{prefix}{field}:{token}"),
            Self::Phrase { field, tokens } => {
                let words: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
                writeln!(f, "{prefix}{field}:\"{}\"", words.join(" "))
            }
            Self::And(children) | Self::Or(children) => {
                let label = if matches!(self, Self::And(_)) { "And" } else { "Or" };
                writeln!(f, "{prefix}{label}")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Field scope while resolving a syntax tree.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Unqualified: search every default field.
    Default,
    /// Inside a `field:` qualifier.
    Field(SearchField),
}

/// Resolves syntax trees into analyzed query trees.
pub struct QueryTreeBuilder<'a> {
    /// Analyzers matching the ones used at index time.
    analyzers: &'a Analyzers,
}

impl<'a> QueryTreeBuilder<'a> {
    /// Creates a builder using the index's analyzers.
    pub fn new(analyzers: &'a Analyzers) -> Self {
        Self { analyzers }
    }

    /// Resolves `expr`. Returns `None` when every word analyzes away.
    ///
    /// Unqualified words search `content` and `filename`, combined with Or so a match in
    /// either field scores. A prefix that names no field is searched as text; a known
    /// field qualifier nested inside another is an error.
    pub fn build(&self, expr: &QueryExpr) -> Result<Option<QueryTree>, QueryError> {
        self.resolve(expr, Scope::Default)
    }

    /// Recursive resolution under a field scope.
    fn resolve(&self, expr: &QueryExpr, scope: Scope) -> Result<Option<QueryTree>, QueryError> {
        match expr {
            QueryExpr::Term(word) => Ok(self.leaves(word, scope)),
            QueryExpr::Phrase(words) => Ok(self.leaves(&words.join(" "), scope)),
            QueryExpr::And(children) => Ok(QueryTree::and(self.resolve_all(children, scope)?)),
            QueryExpr::Or(children) => Ok(QueryTree::or(self.resolve_all(children, scope)?)),
            QueryExpr::Field { name, expr } => {
                let Some(field) = SearchField::from_name(name) else {
                    return self.resolve_literal_prefix(name, expr, scope);
                };
                if let Scope::Field(outer) = scope {
                    return Err(QueryError::compile(format!(
                        "nested field qualifier '{name}:' inside '{outer}:'"
                    )));
                }
                self.resolve(expr, Scope::Field(field))
            }
        }
    }

    /// Resolves `name:expr` where `name` is not a field as ordinary text in `scope`.
    ///
    /// `12:30` and `Note: fox` become phrases, since the colon is a token separator.
    /// A group after the prefix is ANDed with the prefix word.
    fn resolve_literal_prefix(
        &self,
        name: &str,
        expr: &QueryExpr,
        scope: Scope,
    ) -> Result<Option<QueryTree>, QueryError> {
        if let Some(text) = literal_text(name, expr) {
            return Ok(self.leaves(&text, scope));
        }
        let mut children: Vec<QueryTree> = self.leaves(name, scope).into_iter().collect();
        children.extend(self.resolve(expr, scope)?);
        Ok(QueryTree::and(children))
    }

    /// Resolves children, dropping those that analyze away.
    fn resolve_all(
        &self,
        children: &[QueryExpr],
        scope: Scope,
    ) -> Result<Vec<QueryTree>, QueryError> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            if let Some(tree) = self.resolve(child, scope)? {
                out.push(tree);
            }
        }
        Ok(out)
    }

    /// Builds the leaves for `text` in every field of `scope`.
    fn leaves(&self, text: &str, scope: Scope) -> Option<QueryTree> {
        match scope {
            Scope::Field(field) => self.leaf(field, text),
            Scope::Default => QueryTree::or(
                SearchField::DEFAULT
                    .into_iter()
                    .filter_map(|field| self.leaf(field, text))
                    .collect(),
            ),
        }
    }

    /// Builds a single-field leaf: a term for one token, a phrase for several.
    fn leaf(&self, field: SearchField, text: &str) -> Option<QueryTree> {
        let mut tokens = self.analyzers.analyze(field, text);
        match tokens.len() {
            0 => None,
            1 => tokens.pop().map(|t| QueryTree::Term {
                field,
                token: t.text,
            }),
            _ => {
                let base = tokens[0].position;
                Some(QueryTree::Phrase {
                    field,
                    tokens: tokens
                        .into_iter()
                        .map(|t| (t.position - base, t.text))
                        .collect(),
                })
            }
        }
    }
}

/// Rejoins `name:expr` into the text it was lexed from, if `expr` is plain words.
fn literal_text(name: &str, expr: &QueryExpr) -> Option<String> {
    match expr {
        QueryExpr::Term(word) => Some(format!("{name}:{word}")),
        QueryExpr::Phrase(words) => Some(format!("{name}: {}", words.join(" "))),
        QueryExpr::Field { name: inner, expr } if SearchField::from_name(inner).is_none() => {
            literal_text(inner, expr).map(|text| format!("{name}:{text}"))
        }
        QueryExpr::Field { .. } | QueryExpr::And(_) | QueryExpr::Or(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use folio_query::{QueryErrorKind, parse};

    use super::*;

    fn build(query: &str) -> Result<Option<QueryTree>, QueryError> {
        let analyzers = Analyzers::new("english", true).unwrap();
        let expr = parse(query)?.expect("query should not be empty");
        QueryTreeBuilder::new(&analyzers).build(&expr)
    }

    fn term(field: SearchField, token: &str) -> QueryTree {
        QueryTree::Term {
            field,
            token: token.to_string(),
        }
    }

    fn both(content: &str, filename: &str) -> QueryTree {
        QueryTree::Or(vec![
            term(SearchField::Content, content),
            term(SearchField::Filename, filename),
        ])
    }

    #[test]
    fn bare_term_searches_default_fields() {
        assert_eq!(build("Dogs").unwrap(), Some(both("dog", "dogs")));
    }

    #[test]
    fn implicit_and() {
        assert_eq!(
            build("fox dog").unwrap(),
            Some(QueryTree::And(vec![both("fox", "fox"), both("dog", "dog")]))
        );
    }

    #[test]
    fn stop_words_are_dropped() {
        assert_eq!(build("the fox").unwrap(), Some(both("fox", "fox")));
        assert_eq!(build("the").unwrap(), None);
    }

    #[test]
    fn field_qualifier_limits_field() {
        assert_eq!(
            build("filename:report").unwrap(),
            Some(term(SearchField::Filename, "report"))
        );
        assert_eq!(
            build("CONTENT:running").unwrap(),
            Some(term(SearchField::Content, "run"))
        );
    }

    #[test]
    fn phrase_keeps_stop_word_gaps() {
        let tree = build("content:\"quick the fox\"").unwrap();
        assert_eq!(
            tree,
            Some(QueryTree::Phrase {
                field: SearchField::Content,
                tokens: vec![(0, "quick".into()), (2, "fox".into())],
            })
        );
    }

    #[test]
    fn leading_stop_word_is_rebased() {
        let tree = build("content:\"the quick fox\"").unwrap();
        assert_eq!(
            tree,
            Some(QueryTree::Phrase {
                field: SearchField::Content,
                tokens: vec![(0, "quick".into()), (1, "fox".into())],
            })
        );
    }

    #[test]
    fn hyphenated_term_becomes_phrase() {
        let tree = build("content:foo-bar").unwrap();
        assert!(matches!(tree, Some(QueryTree::Phrase { ref tokens, .. }) if tokens.len() == 2));
    }

    #[test]
    fn or_is_preserved() {
        let tree = build("filename:(report OR memo)").unwrap().unwrap();
        let QueryTree::Or(children) = tree else {
            panic!("expected Or, got {tree:?}");
        };
        assert_eq!(children.len(), 2);
    }

    fn phrase(field: SearchField, words: &[&str]) -> QueryTree {
        QueryTree::Phrase {
            field,
            tokens: words
                .iter()
                .enumerate()
                .map(|(i, w)| (i, (*w).to_string()))
                .collect(),
        }
    }

    #[test]
    fn unknown_prefix_is_text() {
        assert_eq!(
            build("12:30").unwrap(),
            Some(QueryTree::Or(vec![
                phrase(SearchField::Content, &["12", "30"]),
                phrase(SearchField::Filename, &["12", "30"]),
            ]))
        );
        assert_eq!(
            build("content:(memo:fox)").unwrap(),
            Some(phrase(SearchField::Content, &["memo", "fox"]))
        );
        assert_eq!(
            build("content:12:30:45").unwrap(),
            Some(phrase(SearchField::Content, &["12", "30", "45"]))
        );
    }

    #[test]
    fn unknown_prefix_before_space_is_text() {
        assert_eq!(
            build("content:(Note: fox)").unwrap(),
            Some(phrase(SearchField::Content, &["note", "fox"]))
        );
        assert_eq!(
            build("content:(note:(fox OR dog))").unwrap(),
            Some(QueryTree::And(vec![
                term(SearchField::Content, "note"),
                QueryTree::Or(vec![
                    term(SearchField::Content, "fox"),
                    term(SearchField::Content, "dog"),
                ]),
            ]))
        );
    }

    #[test]
    fn nested_field_is_error() {
        let err = build("content:(filename:x)").unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::Compile);
        assert!(err.message().contains("nested field qualifier"));
    }

    #[test]
    fn tokens_for_collects_per_field() {
        let tree = build("fox filename:report content:\"lazy dogs\"").unwrap().unwrap();
        let content = tree.tokens_for(SearchField::Content);
        assert!(content.contains("fox"));
        assert!(content.contains("lazi"));
        assert!(content.contains("dog"));
        assert!(!content.contains("report"));
        assert!(tree.tokens_for(SearchField::Filename).contains("report"));
    }

    #[test]
    fn display_renders_tree() {
        let tree = build("fox").unwrap().unwrap();
        assert_eq!(tree.to_string(), "Or\n  content:fox\n  filename:fox\n");
    }
}
