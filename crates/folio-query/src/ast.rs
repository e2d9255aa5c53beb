//! Query abstract syntax tree.
//!
//! Represents parsed query expressions before field resolution and analysis.

use std::fmt;

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// A single search word, exactly as typed.
    Term(String),

    /// An exact phrase (sequence of words).
    Phrase(Vec<String>),

    /// Conjunction: all sub-expressions must match.
    And(Vec<Self>),

    /// Disjunction: at least one sub-expression must match.
    Or(Vec<Self>),

    /// Field-scoped query: search only within a specific field.
    Field {
        /// Field name as written before the colon.
        name: String,
        /// Expression to match within that field.
        expr: Box<Self>,
    },
}

impl QueryExpr {
    /// Creates an And expression, flattening nested Ands.
    pub fn and(exprs: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1
            && let Some(only) = flattened.pop()
        {
            return only;
        }
        Self::And(flattened)
    }

    /// Creates an Or expression, flattening nested Ors.
    pub fn or(exprs: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1
            && let Some(only) = flattened.pop()
        {
            return only;
        }
        Self::Or(flattened)
    }

    /// Wraps an expression in a field qualifier.
    pub fn field(name: impl Into<String>, expr: Self) -> Self {
        Self::Field {
            name: name.into(),
            expr: Box::new(expr),
        }
    }

    /// Returns every word mentioned by the expression, in query order.
    ///
    /// Phrase words are included individually. Field qualifiers are ignored.
    pub fn words(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_words(&mut out);
        out
    }

    /// Recursive helper for [`Self::words`].
    fn collect_words<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Term(word) => out.push(word),
            Self::Phrase(words) => out.extend(words.iter().map(String::as_str)),
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_words(out);
                }
            }
            Self::Field { expr, .. } => expr.collect_words(out),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(s) => writeln!(f, "{prefix}Term({s:?})"),
            Self::Phrase(words) => writeln!(f, "{prefix}Phrase({words:?})"),
            Self::And(exprs) => {
                writeln!(f, "{prefix}And")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(exprs) => {
                writeln!(f, "{prefix}Or")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Field { name, expr } => {
                writeln!(f, "{prefix}Field({name:?})")?;
                expr.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the expression back into query syntax.
    ///
    /// Parsing the output yields an equivalent expression.
    pub fn to_query_string(&self) -> String {
        self.fmt_query_string(false)
    }

    /// Internal helper for query string formatting.
    fn fmt_query_string(&self, nested: bool) -> String {
        match self {
            Self::Term(s) => s.clone(),
            Self::Phrase(words) => format!("\"{}\"", words.join(" ")),
            Self::And(exprs) => {
                let parts: Vec<String> = exprs.iter().map(|e| e.fmt_query_string(true)).collect();
                if nested && exprs.len() > 1 {
                    format!("({})", parts.join(" "))
                } else {
                    parts.join(" ")
                }
            }
            Self::Or(exprs) => {
                let parts: Vec<String> = exprs.iter().map(|e| e.fmt_query_string(true)).collect();
                if nested && exprs.len() > 1 {
                    format!("({})", parts.join(" OR "))
                } else {
                    parts.join(" OR ")
                }
            }
            Self::Field { name, expr } => format!("{name}:{}", expr.fmt_query_string(true)),
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
