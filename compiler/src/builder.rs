use std::fmt::Display;

use crate::lexer::{
    tokenizer::{StringTokenizer, Tokenable},
    Token,
};

/// Query builder for constructing search expressions programmatically.
/// This is the inverse of the syntax tree produced by [`crate::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    /// A single search word, quoted only when it has to be
    Word(String),
    /// Words that must appear next to each other, always quoted
    Phrase(String),
    /// A `key:value` metadata filter
    Filter(String, String),
    /// Logical NOT operation
    Not(Box<QueryExpr>),
    /// Logical AND operation
    And(Box<QueryExpr>, Box<QueryExpr>),
    /// Logical OR operation
    Or(Box<QueryExpr>, Box<QueryExpr>),
}

impl QueryExpr {
    pub fn word<S: Into<String>>(word: S) -> Self {
        QueryExpr::Word(word.into())
    }

    pub fn phrase<S: Into<String>>(phrase: S) -> Self {
        QueryExpr::Phrase(phrase.into())
    }

    pub fn filter<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        QueryExpr::Filter(key.into(), value.into())
    }

    /// Create a NOT expression
    pub fn not(self) -> Self {
        QueryExpr::Not(Box::new(self))
    }

    /// Create an AND expression with another expression
    pub fn and(self, other: QueryExpr) -> Self {
        QueryExpr::And(Box::new(self), Box::new(other))
    }

    /// Create an OR expression with another expression
    pub fn or(self, other: QueryExpr) -> Self {
        QueryExpr::Or(Box::new(self), Box::new(other))
    }

    /// Convert the expression to a query string that can be parsed by the lexer
    pub fn to_query_string(&self) -> String {
        match self {
            QueryExpr::Word(word) => quote_if_needed(word),
            QueryExpr::Phrase(phrase) => quote(phrase),
            QueryExpr::Filter(key, value) => {
                format!("{}:{}", quote_if_needed(key), quote_if_needed(value))
            }
            QueryExpr::Not(inner) => format!("!({})", inner.to_query_string()),
            QueryExpr::And(left, right) => format!(
                "({} & {})",
                left.to_query_string(),
                right.to_query_string()
            ),
            QueryExpr::Or(left, right) => format!(
                "({} | {})",
                left.to_query_string(),
                right.to_query_string()
            ),
        }
    }
}

impl Display for QueryExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

/// A word can stay bare only if the tokenizer reads it back as that same word
fn quote_if_needed(text: &str) -> String {
    match StringTokenizer::tokenize(text).as_deref() {
        Ok([Token::Word(word)]) if word == text => text.to_string(),
        _ => quote(text),
    }
}

fn quote(text: &str) -> String {
    let mut ret = String::with_capacity(text.len() + 2);
    ret.push('"');
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            ret.push('\\');
        }
        ret.push(ch);
    }
    ret.push('"');
    ret
}

/// Builder for constructing complex search queries fluently
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    expr: Option<QueryExpr>,
}

impl QueryBuilder {
    /// Create a new empty query builder
    pub fn new() -> Self {
        Self { expr: None }
    }

    /// Start with a word
    pub fn word<S: Into<String>>(word: S) -> Self {
        Self {
            expr: Some(QueryExpr::word(word)),
        }
    }

    /// Add an AND condition
    pub fn and<S: Into<String>>(self, word: S) -> Self {
        self.and_expr(QueryExpr::word(word))
    }

    /// Add an AND condition with a complex expression
    pub fn and_expr(mut self, expr: QueryExpr) -> Self {
        self.expr = Some(match self.expr {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    pub fn phrase<S: Into<String>>(self, phrase: S) -> Self {
        self.and_expr(QueryExpr::phrase(phrase))
    }

    /// Restrict the results to documents whose `key` metadata is `value`
    pub fn filter<K: Into<String>, V: Into<String>>(self, key: K, value: V) -> Self {
        self.and_expr(QueryExpr::filter(key, value))
    }

    /// Add an OR condition
    pub fn or<S: Into<String>>(self, word: S) -> Self {
        self.or_expr(QueryExpr::word(word))
    }

    /// Add an OR condition with a complex expression
    pub fn or_expr(mut self, expr: QueryExpr) -> Self {
        self.expr = Some(match self.expr {
            Some(existing) => existing.or(expr),
            None => expr,
        });
        self
    }

    /// Negate the entire current expression
    pub fn not(mut self) -> Self {
        if let Some(expr) = self.expr {
            self.expr = Some(expr.not());
        }
        self
    }

    /// Build the final query expression
    pub fn build(self) -> Option<QueryExpr> {
        self.expr
    }

    /// Build and convert to query string
    pub fn to_query_string(self) -> Option<String> {
        self.expr.map(|expr| expr.to_query_string())
    }
}
