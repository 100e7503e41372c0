//! A query lexer that tokenizes, parses, and compiles search queries into
//! Postgres `tsquery` expressions.
//!
//! The pipeline runs in five stages, each taking ownership of the previous
//! tree and returning a freshly built one:
//!   1. [`simplify`] removes double negations and nested conjunctions
//!   2. [`lemmas`] replaces raw terms with their normalized lemmas or phrases
//!   3. [`augment`] optionally widens single terms with weighted synonyms
//!   4. [`tsquery`] serializes the tree into a match expression
//!   5. [`filters`] projects the `key:value` clauses into a [`FilterTree`]

use std::fmt::Display;

use serde::Serialize;

/// Raised while turning the raw query string into a syntax tree
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Empty query")]
    EmptyQuery,
    #[error("Unclosed quoted string")]
    UnclosedQuote,
    #[error("Missing closing parenthesis")]
    MissingClosingParen,
    #[error("Unexpected closing parenthesis")]
    UnexpectedClosingParen,
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Unexpected token in query: {0}")]
    UnexpectedToken(String),
    #[error("Query nests deeper than {0} levels")]
    TooDeep(usize),
}

/// Describes an error that occurred during query compilation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("Lemmatizer failed for lang={lang} on {text:?}")]
    NormalizationFailure { lang: String, text: String },
}

/// Describes a lexical token in the search language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word, never one of the reserved keywords
    Word(String),
    /// A double quoted string with the quotes removed and escapes resolved
    Quoted(String),
    And,
    Or,
    Not,
    Colon,
    LParen,
    RParen,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(word) => write!(f, "{}", word),
            Token::Quoted(text) => write!(f, "{:?}", text),
            Token::And => write!(f, "&"),
            Token::Or => write!(f, "|"),
            Token::Not => write!(f, "!"),
            Token::Colon => write!(f, ":"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Describes a node in the query syntax tree.
///
/// The same type is used from parsing to serialization. Leaves start out raw
/// (a quoted literal keeps its surrounding quotes in `Term`) and are
/// normalized by the lemma stage; `Augment` only appears after augmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Or(Vec<Node>),
    And(Vec<Node>),
    Not(Box<Node>),
    Term(String),
    /// `gaps[i]` counts the removed positions between `lemmas[i]` and `lemmas[i + 1]`
    Phrase { lemmas: Vec<String>, gaps: Vec<usize> },
    Augment { original: String, synonyms: Vec<String> },
    Filter { key: String, value: String },
}

impl Node {
    pub fn term<S: Into<String>>(text: S) -> Self {
        Node::Term(text.into())
    }

    pub fn filter<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Node::Filter {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn not(self) -> Self {
        Node::Not(Box::new(self))
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(f: &mut std::fmt::Formatter<'_>, name: &str, parts: &[Node]) -> std::fmt::Result {
            write!(f, "{}[", name)?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", part)?;
            }
            write!(f, "]")
        }

        match self {
            Node::Or(parts) => join(f, "Or", parts),
            Node::And(parts) => join(f, "And", parts),
            Node::Not(inner) => write!(f, "Not({})", inner),
            Node::Term(text) => write!(f, "Term({})", text),
            Node::Phrase { lemmas, gaps } => write!(f, "Phrase({:?}, {:?})", lemmas, gaps),
            Node::Augment { original, synonyms } => {
                write!(f, "Augment({}, {:?})", original, synonyms)
            }
            Node::Filter { key, value } => write!(f, "Filter({}:{})", key, value),
        }
    }
}

/// The boolean structure of the metadata filters of a query, with all search
/// terms removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTree {
    And(Vec<FilterTree>),
    Or(Vec<FilterTree>),
    Not(Box<FilterTree>),
    Filter { key: String, value: String },
}

impl FilterTree {
    pub fn filter<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        FilterTree::Filter {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub mod augment;
pub mod compiler;
pub mod filters;
pub mod lemmas;
pub mod simplify;
pub mod tokenizer;
pub mod tsquery;
