use std::{collections::HashMap, path::Path};

use crate::{
    config::Config,
    nlp::{Augmenter, CollaboratorError},
};

/// How many candidates are suggested for a word by default
pub const DEFAULT_SYNONYM_LIMIT: usize = 5;

/// An [`Augmenter`] backed by a fixed per-language synonym table.
///
/// Candidates are returned in table order, skipping the word itself and
/// anything a single character long, up to `limit` entries.
#[derive(Debug, Clone)]
pub struct SynonymAugmenter {
    table: HashMap<String, HashMap<String, Vec<String>>>,
    limit: usize,
}

impl Default for SynonymAugmenter {
    fn default() -> Self {
        SynonymAugmenter {
            table: HashMap::new(),
            limit: DEFAULT_SYNONYM_LIMIT,
        }
    }
}

impl SynonymAugmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_synonyms<I, S>(mut self, lang: &str, word: &str, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .entry(lang.to_string())
            .or_default()
            .entry(word.to_string())
            .or_default()
            .extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Load a table shaped like `{"en": {"word": ["synonym", ...]}}`
    pub fn from_json_str(json: &str) -> Result<Self, CollaboratorError> {
        let table = serde_json::from_str(json)?;
        Ok(SynonymAugmenter {
            table,
            ..Self::default()
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CollaboratorError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Augmenter for SynonymAugmenter {
    fn augment(&self, lang: &str, word: &str, _config: &Config) -> Vec<String> {
        let Some(candidates) = self.table.get(lang).and_then(|words| words.get(word)) else {
            return vec![];
        };
        candidates
            .iter()
            .filter(|candidate| candidate.chars().count() > 1 && candidate.as_str() != word)
            .take(self.limit)
            .cloned()
            .collect()
    }
}
