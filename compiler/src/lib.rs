//! # chajda
//!
//! A query compiler for multilingual full text search in postgres. Users
//! write boolean search expressions with terms, `"quoted phrases"`,
//! `AND`/`OR`/`NOT`, parentheses and `key:value` filters; [`compile`] turns
//! them into a weighted `tsquery` expression plus a separate [`FilterTree`]
//! for the metadata filters.
//!
//! ```
//! use chajda::{compile, Config, FilterTree, nlp::lemmatizer::SurfaceLemmatizer};
//!
//! let lemmatizer = SurfaceLemmatizer::new();
//! let compiled = compile("en", "Rust compiler lang:en", None, &Config::default(), &lemmatizer).unwrap();
//! assert_eq!(compiled.match_expression, "rust & compiler");
//! assert_eq!(
//!     compiled.filter_tree,
//!     Some(FilterTree::And(vec![FilterTree::filter("lang", "en")]))
//! );
//! ```

pub mod builder;
pub mod config;
pub mod lexer;
pub mod nlp;
pub mod tsvector;

pub use crate::config::{Config, ConfigError};
pub use crate::lexer::{
    augment::AugmentedTerms,
    compiler::{CompiledQuery, QueryCompiler},
    tokenizer::parse,
    FilterTree, Node, QueryError, SyntaxError,
};
pub use crate::nlp::{Augmenter, Lemma, Lemmatizer};

/// Compile a raw query for `lang`, augmenting single terms when an
/// `augmenter` is given.
///
/// Fails with [`QueryError::Syntax`] on malformed queries and with
/// [`QueryError::NormalizationFailure`] when the lemmatizer cannot process a
/// term at all.
pub fn compile(
    lang: &str,
    query: &str,
    augmenter: Option<&dyn Augmenter>,
    config: &Config,
    lemmatizer: &dyn Lemmatizer,
) -> Result<CompiledQuery, QueryError> {
    let compiler = QueryCompiler::new(lang, config, lemmatizer);
    match augmenter {
        Some(augmenter) => compiler.with_augmenter(augmenter).compile(query),
        None => compiler.compile(query),
    }
}

/// Like [`compile`] without augmentation, returning only the match expression
pub fn to_tsquery(
    lang: &str,
    query: &str,
    config: &Config,
    lemmatizer: &dyn Lemmatizer,
) -> Result<String, QueryError> {
    Ok(compile(lang, query, None, config, lemmatizer)?.match_expression)
}

#[doc(hidden)]
pub use tracing;

#[macro_export]
macro_rules! chajda_log {
    ($level:ident, $module:expr, $lang:expr, $msg:expr $(, $args:expr)* $(,)?) => {
        $crate::tracing::$level!(
            "[{}][{}] {}", $module, $lang, format!($msg $(, $args)*)
        )
    }
}
