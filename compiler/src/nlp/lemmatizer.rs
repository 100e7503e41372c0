use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    path::Path,
};

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;
use yake_rust::StopWords;

use crate::{
    chajda_log,
    config::Config,
    nlp::{CollaboratorError, Lemma, Lemmatizer},
};

/// Languages whose stop words are loaded up front
static PRELOADED_LANGS: [&str; 6] = ["en", "fr", "de", "es", "it", "pt"];

static STOPWORDS_CACHE: Lazy<HashMap<String, StopWords>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for lang in PRELOADED_LANGS {
        if let Some(stop_words) = StopWords::predefined(lang) {
            map.insert(lang.to_string(), stop_words);
        }
    }
    map
});

fn predefined_stop_words(lang: &str) -> Option<Cow<'static, StopWords>> {
    if let Some(cached) = STOPWORDS_CACHE.get(lang) {
        return Some(Cow::Borrowed(cached));
    }
    let loaded = StopWords::predefined(lang).map(Cow::Owned);
    if loaded.is_none() {
        chajda_log!(
            warn,
            "Lemmatizer",
            lang,
            "No stop words for language {}, keeping every word",
            lang
        );
    }
    loaded
}

/// A lemmatizer working on surface forms.
///
/// Text is case folded, stripped of punctuation and symbols, split at Unicode
/// word boundaries and filtered against the language's stop words, following
/// the [`Config`] flags. Each remaining word is looked up in an optional lemma
/// table and is its own lemma otherwise.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLemmatizer {
    lemmas: HashMap<String, String>,
    stop_words: HashMap<String, HashSet<String>>,
}

impl SurfaceLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lemma<W: Into<String>, L: Into<String>>(mut self, word: W, lemma: L) -> Self {
        self.lemmas.insert(word.into(), lemma.into());
        self
    }

    pub fn with_lemmas<I, W, L>(mut self, lemmas: I) -> Self
    where
        I: IntoIterator<Item = (W, L)>,
        W: Into<String>,
        L: Into<String>,
    {
        self.lemmas
            .extend(lemmas.into_iter().map(|(w, l)| (w.into(), l.into())));
        self
    }

    /// Add stop words for `lang` on top of the predefined list
    pub fn with_stop_words<I, S>(mut self, lang: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words
            .entry(lang.to_string())
            .or_default()
            .extend(words.into_iter().map(|w| w.into().to_lowercase()));
        self
    }

    /// Load a lemma table from a JSON object of `{"word": "lemma"}` pairs
    pub fn from_json_str(json: &str) -> Result<Self, CollaboratorError> {
        let lemmas: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new().with_lemmas(lemmas))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CollaboratorError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn is_stop_word(&self, lang: &str, predefined: Option<&StopWords>, token: &str) -> bool {
        let key = token.to_lowercase();
        self.stop_words
            .get(lang)
            .map_or(false, |extra| extra.contains(key.as_str()))
            || predefined.map_or(false, |list| list.contains(key.as_str()))
    }

    /// Exact table entries win over the case folded ones
    fn lemma_of(&self, token: &str, config: &Config) -> String {
        let lemma = self
            .lemmas
            .get(token)
            .or_else(|| self.lemmas.get(&token.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(token);
        lemma.chars().take(config.max_lemma_size).collect()
    }
}

/// Drop punctuation, symbols and control characters. Combining marks belong
/// to the grapheme of the character they modify and are kept with it.
fn remove_special_chars(text: &str) -> String {
    text.graphemes(true)
        .filter(|grapheme| {
            grapheme
                .chars()
                .next()
                .map_or(false, |c| c.is_alphanumeric() || c.is_whitespace())
        })
        .collect()
}

impl Lemmatizer for SurfaceLemmatizer {
    fn lemmatize(
        &self,
        lang: &str,
        text: &str,
        add_positions: bool,
        config: &Config,
    ) -> Option<Vec<Lemma>> {
        if lang.trim().is_empty() {
            chajda_log!(warn, "Lemmatizer", lang, "Missing language for {:?}", text);
            return None;
        }

        let mut text = if config.lower_case {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        if config.remove_special_chars {
            text = remove_special_chars(&text);
        }

        let predefined = if config.remove_stop_words {
            predefined_stop_words(lang)
        } else {
            None
        };

        let lemmas = text
            .split_word_bounds()
            .filter(|segment| !segment.chars().all(char::is_whitespace))
            .enumerate()
            .filter(|(_, token)| {
                !config.remove_stop_words || !self.is_stop_word(lang, predefined.as_deref(), token)
            })
            .filter_map(|(i, token)| {
                let lemma = self.lemma_of(token, config);
                let position = if add_positions { i + 1 } else { 0 };
                (!lemma.is_empty()).then(|| Lemma::new(lemma, position))
            })
            .collect();
        Some(lemmas)
    }
}
