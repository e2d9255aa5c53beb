//! Error types for query parsing and field resolution.

use std::{error::Error as StdError, fmt};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {position})")]
pub struct LexError {
    /// What went wrong.
    pub message: String,
    /// Byte offset in `input` where the problem starts.
    pub position: usize,
    /// The text being tokenized.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset of the offending token; `None` at end of input.
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// The stage at which a query was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Tokenization failed, e.g. an unclosed quote.
    Lex,
    /// The tokens do not form a valid expression.
    Parse,
    /// Valid syntax the index cannot serve, such as a field nested in another field.
    Compile,
}

/// A rejected query, renderable with a marker under the offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// Stage that rejected the query.
    pub kind: QueryErrorKind,
    /// Description without the query text.
    message: String,
    /// Byte offset the error points at, if known.
    position: Option<usize>,
    /// The query text, once known.
    pub query: Option<String>,
}

impl QueryError {
    /// Creates an error of the given kind.
    fn new(kind: QueryErrorKind, message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            query: None,
        }
    }

    /// Creates an error for a query the index cannot evaluate.
    pub fn compile(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Compile, message, None)
    }

    /// Attaches the query text, used when rendering the position marker.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the byte position the error points at, if known.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Returns a hint for fixing common mistakes.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message.as_str();
        match self.kind {
            QueryErrorKind::Lex if message.contains("unclosed quote") => {
                Some("close the phrase with a matching \"")
            }
            QueryErrorKind::Parse if message.contains("closing parenthesis") => {
                Some("every ( needs a matching )")
            }
            QueryErrorKind::Parse if message.contains("OR") => {
                Some("OR joins two expressions, as in 'budget OR forecast'")
            }
            QueryErrorKind::Compile if message.contains("nested field") => {
                Some("qualify each part separately, as in 'content:fox filename:report'")
            }
            _ => None,
        }
    }

    /// Column of the position marker, counted in characters of the query text.
    fn marker_column(&self, query: &str) -> Option<usize> {
        let position = self.position?.min(query.len());
        Some(
            query
                .char_indices()
                .take_while(|(offset, _)| *offset < position)
                .count(),
        )
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            QueryErrorKind::Lex | QueryErrorKind::Parse => "query syntax error",
            QueryErrorKind::Compile => "query error",
        };
        writeln!(f, "{label}: {}", self.message)?;

        if let Some(query) = &self.query {
            writeln!(f, "  {query}")?;
            if let Some(column) = self.marker_column(query) {
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(hint) = self.suggestion() {
            write!(f, "hint: {hint}")?;
        }
        Ok(())
    }
}

impl StdError for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self::new(QueryErrorKind::Lex, err.message, Some(err.position)).with_query(err.input)
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self::new(QueryErrorKind::Parse, err.message, err.position)
    }
}
