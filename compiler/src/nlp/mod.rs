//! Contracts for the language tools the compiler depends on, plus small
//! reference implementations of them.
//!
//! The compiler never loads models itself: callers hand it a [`Lemmatizer`]
//! and optionally an [`Augmenter`]. Both traits are implemented for plain
//! closures. Implementations shared between threads must be `Sync`; the
//! compiler itself keeps no state between calls.

use lingua::{LanguageDetector, LanguageDetectorBuilder};
use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

/// Language code used when no better language is known; it has no stop words.
pub const MULTILINGUAL: &str = "xx";

/// A normalized word with the 1-based position of the source word it came
/// from. Removed words still consume a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lemma {
    pub lemma: String,
    pub position: usize,
}

impl Lemma {
    pub fn new<S: Into<String>>(lemma: S, position: usize) -> Self {
        Lemma {
            lemma: lemma.into(),
            position,
        }
    }
}

/// Normalizes surface text into lemmas.
pub trait Lemmatizer {
    /// Returns `None` only when the whole text could not be processed.
    /// Stop words simply shorten the result. When `add_positions` is false,
    /// implementations may report position 0.
    fn lemmatize(
        &self,
        lang: &str,
        text: &str,
        add_positions: bool,
        config: &Config,
    ) -> Option<Vec<Lemma>>;
}

impl<F> Lemmatizer for F
where
    F: Fn(&str, &str, bool, &Config) -> Option<Vec<Lemma>>,
{
    fn lemmatize(
        &self,
        lang: &str,
        text: &str,
        add_positions: bool,
        config: &Config,
    ) -> Option<Vec<Lemma>> {
        self(lang, text, add_positions, config)
    }
}

/// Suggests words similar to `word`, most similar first. An empty list means
/// there is nothing to add.
pub trait Augmenter {
    fn augment(&self, lang: &str, word: &str, config: &Config) -> Vec<String>;
}

impl<F> Augmenter for F
where
    F: Fn(&str, &str, &Config) -> Vec<String>,
{
    fn augment(&self, lang: &str, word: &str, config: &Config) -> Vec<String> {
        self(lang, word, config)
    }
}

#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid data file JSON: {0}")]
    Json(#[from] serde_json::Error),
}

static LANGUAGE_DETECTOR: Lazy<LanguageDetector> =
    Lazy::new(|| LanguageDetectorBuilder::from_all_languages().build());

/// Guess the ISO 639-1 code of the language `text` is written in
pub fn detect_language(text: &str) -> Option<String> {
    let lang = LANGUAGE_DETECTOR.detect_language_of(text)?;
    Some(lang.iso_code_639_1().to_string())
}

pub mod lemmatizer;
pub mod synonyms;
