//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → primary+
//! primary    → TERM | PHRASE | field_expr | "(" or_expr ")"
//! field_expr → FIELD_PREFIX (TERM | PHRASE | "(" or_expr ")")
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Field prefix: `field:`
//! 3. AND (implicit, between adjacent terms)
//! 4. OR (explicit keyword)

use std::mem;

use crate::{
    ast::QueryExpr,
    error::{ParseError, QueryError},
    lexer::{Token, tokenize_spanned},
};

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse, each with its starting byte offset.
    tokens: Vec<(Token, usize)>,
    /// Current position in token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<Option<QueryExpr>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_or_expr()?;

        if let Some(token) = self.peek() {
            let message = match token {
                Token::RParen => "unexpected closing parenthesis".to_string(),
                other => format!("unexpected token: {other:?}"),
            };
            return Err(self.error(message));
        }

        Ok(Some(expr))
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = QueryExpr::or(vec![left, right]);
        }

        Ok(left)
    }

    /// Parses: and_expr → primary+
    fn parse_and_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut exprs = vec![self.parse_primary()?];

        while self.can_start_primary() {
            exprs.push(self.parse_primary()?);
        }

        Ok(QueryExpr::and(exprs))
    }

    /// Checks if the current token can start a primary expression.
    fn can_start_primary(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Term(_) | Token::Phrase(_) | Token::LParen | Token::FieldPrefix(_))
        )
    }

    /// Parses: primary → TERM | PHRASE | field_expr | "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<QueryExpr, ParseError> {
        match self.peek().cloned() {
            Some(Token::Term(_) | Token::Phrase(_)) => self.parse_term_or_phrase(),

            Some(Token::FieldPrefix(name)) => {
                self.advance();
                self.parse_field_expr(name)
            }

            Some(Token::LParen) => self.parse_group("expected closing parenthesis"),

            Some(Token::RParen) => Err(self.error("unexpected closing parenthesis")),

            Some(Token::Or) => Err(self.error("unexpected OR (needs expression before it)")),

            None => Err(ParseError::new("unexpected end of query", None)),
        }
    }

    /// Parses the expression after a field prefix.
    fn parse_field_expr(&mut self, name: String) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek().cloned() {
            Some(Token::Term(_) | Token::Phrase(_)) => self.parse_term_or_phrase()?,
            Some(Token::LParen) => {
                self.parse_group("expected closing parenthesis after field expression")?
            }
            Some(Token::FieldPrefix(inner)) => {
                self.advance();
                self.parse_field_expr(inner)?
            }
            _ => {
                return Err(self.error(format!(
                    "expected term, phrase, or group after '{name}:'"
                )));
            }
        };

        Ok(QueryExpr::field(name, expr))
    }

    /// Parses a TERM or PHRASE token into a QueryExpr, consuming the token.
    fn parse_term_or_phrase(&mut self) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek() {
            Some(Token::Term(text)) => QueryExpr::Term(text.clone()),
            Some(Token::Phrase(text)) => {
                let words: Vec<String> = text.split_whitespace().map(String::from).collect();
                if words.is_empty() {
                    return Err(self.error("empty phrase"));
                }
                QueryExpr::Phrase(words)
            }
            _ => return Err(self.error("expected term or phrase")),
        };
        self.advance();
        Ok(expr)
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self, missing_rparen_msg: &str) -> Result<QueryExpr, ParseError> {
        self.advance(); // (
        if self.check(&Token::RParen) {
            return Err(self.error("empty group"));
        }
        let inner = self.parse_or_expr()?;

        if !self.check(&Token::RParen) {
            return Err(self.error(missing_rparen_msg));
        }
        self.advance(); // )

        Ok(inner)
    }

    /// Builds an error pointing at the current token (or the end of input).
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.tokens.get(self.position).map(|(_, at)| *at))
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    /// Checks if the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into an AST.
///
/// Returns `Ok(None)` for empty queries, `Ok(Some(expr))` for valid queries,
/// or `Err(QueryError)` for invalid syntax. Errors carry the query text.
pub fn parse(input: &str) -> Result<Option<QueryExpr>, QueryError> {
    let tokens = tokenize_spanned(input).map_err(QueryError::from)?;
    Parser::new(tokens)
        .parse()
        .map_err(|e| QueryError::from(e).with_query(input))
}
