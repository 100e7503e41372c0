//! Document side helpers. A document indexed with [`to_tsvector`] matches the
//! queries compiled with the same language, [`Config`] and [`Lemmatizer`].

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{chajda_log, config::Config, nlp::Lemmatizer};

/// Normalize `text` into `lemma:position` pairs that postgres casts into a
/// `tsvector`, e.g. `unite:2 state:3 america:5 country:8`.
pub fn to_tsvector<L: Lemmatizer + ?Sized>(
    lang: &str,
    text: &str,
    config: &Config,
    lemmatizer: &L,
) -> Option<String> {
    let Some(lemmas) = lemmatizer.lemmatize(lang, text, true, config) else {
        chajda_log!(warn, "Tsvector", lang, "Failed to lemmatize {:?}", text);
        return None;
    };
    let pairs: Vec<String> = lemmas
        .iter()
        .map(|lemma| format!("{}:{}", lemma.lemma, lemma.position))
        .collect();
    Some(pairs.join(" "))
}

/// Recover the ordered stream of lexemes behind a tsvector.
///
/// Accepts both the output of [`to_tsvector`] and postgres' own text form
/// (`'fanci':1,9 'pie':3`). A lexeme with several positions appears once per
/// position.
pub fn positioned_lexemes(tsv: &str) -> Vec<(usize, String)> {
    let mut ret = Vec::new();
    for item in tsv.split_whitespace() {
        let Some((lexeme, positions)) = item.rsplit_once(':') else {
            chajda_log!(warn, "Tsvector", "-", "Skipping item without positions {:?}", item);
            continue;
        };
        let lexeme = lexeme.trim_matches('\'');
        for position in positions.split(',') {
            // postgres appends weights like `3A`
            let digits = position.trim_end_matches(|c: char| c.is_ascii_alphabetic());
            match digits.parse::<usize>() {
                Ok(position) => ret.push((position, lexeme.to_string())),
                Err(_) => chajda_log!(
                    warn,
                    "Tsvector",
                    "-",
                    "Skipping invalid position {:?} of {:?}",
                    position,
                    lexeme
                ),
            }
        }
    }
    ret.sort_by_key(|(position, _)| *position);
    ret
}

/// Group the lexemes of a tsvector into n-grams of up to `n` words.
///
/// Every lexeme is emitted on its own, followed by the longer n-grams that
/// end at it. An n-gram only spans strictly consecutive positions, so a
/// removed stop word breaks it. With `uniq`, repeated n-grams are dropped,
/// keeping the first occurrence.
pub fn tsvector_to_ngrams(tsv: &str, n: usize, uniq: bool) -> Vec<String> {
    let lexemes = positioned_lexemes(tsv);
    let mut ngrams = Vec::new();
    for (i, (position, lexeme)) in lexemes.iter().enumerate() {
        ngrams.push(lexeme.clone());
        let mut ngram = lexeme.clone();
        for j in 1..n.min(i + 1) {
            let (prev_position, prev_lexeme) = &lexemes[i - j];
            if position - prev_position != j {
                break;
            }
            ngram = format!("{} {}", prev_lexeme, ngram);
            ngrams.push(ngram.clone());
        }
    }

    if uniq {
        let mut seen = HashSet::new();
        ngrams.retain(|ngram| seen.insert(ngram.clone()));
    }
    ngrams
}

/// Pair every focus n-gram of a tsvector with the words around it, for
/// word2vec style training.
///
/// Focus words are the 1..=`n`-grams of the lexeme stream; their context is
/// up to `window` single lexemes on each side. Positions only order the
/// lexemes, so removed stop words do not widen the window. Returns
/// `(focus, context, count)` triples in first-seen order. Sentence
/// boundaries are not known to a tsvector and are ignored.
pub fn tsvector_to_wordcontext(
    tsv: &str,
    n: usize,
    window: usize,
) -> Vec<(String, String, usize)> {
    let lexemes: Vec<String> = positioned_lexemes(tsv)
        .into_iter()
        .map(|(_, lexeme)| lexeme)
        .collect();

    let mut contexts: IndexMap<String, IndexMap<String, usize>> = IndexMap::new();
    for i in 0..lexemes.len() {
        for j in 0..n.min(lexemes.len() - i) {
            let end = i + j + 1;
            let left = &lexemes[i.saturating_sub(window)..i];
            let right = &lexemes[end..end.saturating_add(window).min(lexemes.len())];
            let counts = contexts.entry(lexemes[i..end].join(" ")).or_default();
            for word in left.iter().chain(right) {
                *counts.entry(word.clone()).or_insert(0) += 1;
            }
        }
    }

    contexts
        .into_iter()
        .flat_map(|(focus, counts)| {
            counts
                .into_iter()
                .map(move |(context, count)| (focus.clone(), context, count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{lemmatizer::SurfaceLemmatizer, Lemma};

    // from postgres' to_tsvector('english', 'fancy apple pie crust is the most delicious ...')
    const PIE: &str = "'appl':2 'crust':4 'delici':8 'eaten':25 'ever':14 'fanci':1,9 'love':17 'pie':3,10,18";

    #[test]
    fn test_to_tsvector() {
        let lemmatizer = SurfaceLemmatizer::new().with_stop_words("zz", ["of", "is", "a"]);
        assert_eq!(
            to_tsvector("zz", "United States of America is a country.", &Config::default(), &lemmatizer),
            Some("united:1 states:2 america:4 country:7".to_string())
        );
        let config = Config {
            max_lemma_size: 5,
            ..Config::default()
        };
        assert_eq!(
            to_tsvector(
                "xx",
                "reallybigword1 verybigword2 reallyreallyreallybigword3",
                &config,
                &lemmatizer
            ),
            Some("reall:1 veryb:2 reall:3".to_string())
        );
    }

    #[test]
    fn test_to_tsvector_failure() {
        let failing = |_: &str, _: &str, _: bool, _: &Config| -> Option<Vec<Lemma>> { None };
        assert_eq!(to_tsvector("xx", "text", &Config::default(), &failing), None);
    }

    #[test]
    fn test_positioned_lexemes() {
        assert_eq!(positioned_lexemes("aaa:1"), vec![(1, "aaa".to_string())]);
        assert_eq!(
            positioned_lexemes("aaa:1 bbb:2 ccc:3 aaa:4"),
            vec![
                (1, "aaa".to_string()),
                (2, "bbb".to_string()),
                (3, "ccc".to_string()),
                (4, "aaa".to_string()),
            ]
        );
        assert_eq!(
            positioned_lexemes("'pie':3,10 'fanci':1A,9"),
            vec![
                (1, "fanci".to_string()),
                (3, "pie".to_string()),
                (9, "fanci".to_string()),
                (10, "pie".to_string()),
            ]
        );
    }

    #[test]
    fn test_positioned_lexemes_skips_malformed_items() {
        assert_eq!(
            positioned_lexemes("broken aaa:x bbb:2"),
            vec![(2, "bbb".to_string())]
        );
    }

    #[test]
    fn test_unigrams() {
        assert_eq!(
            tsvector_to_ngrams(PIE, 1, false),
            vec![
                "fanci", "appl", "pie", "crust", "delici", "fanci", "pie", "ever", "love", "pie",
                "eaten"
            ]
        );
    }

    #[test]
    fn test_bigrams() {
        assert_eq!(
            tsvector_to_ngrams(PIE, 2, false),
            vec![
                "fanci", "appl", "fanci appl", "pie", "appl pie", "crust", "pie crust", "delici",
                "fanci", "delici fanci", "pie", "fanci pie", "ever", "love", "pie", "love pie",
                "eaten"
            ]
        );
    }

    #[test]
    fn test_trigrams() {
        assert_eq!(
            tsvector_to_ngrams(PIE, 3, false),
            vec![
                "fanci", "appl", "fanci appl", "pie", "appl pie", "fanci appl pie", "crust",
                "pie crust", "appl pie crust", "delici", "fanci", "delici fanci", "pie",
                "fanci pie", "delici fanci pie", "ever", "love", "pie", "love pie", "eaten"
            ]
        );
    }

    #[test]
    fn test_ngrams_with_huge_positions() {
        let tsv = format!("'a':{max} 'b':{max}", max = usize::MAX);
        assert_eq!(tsvector_to_ngrams(&tsv, 2, false), vec!["a", "b"]);
        let tsv = format!("'a':{} 'b':{}", usize::MAX - 1, usize::MAX);
        assert_eq!(tsvector_to_ngrams(&tsv, 2, false), vec!["a", "b", "a b"]);
    }

    fn triples(expected: &[(&str, &str, usize)]) -> Vec<(String, String, usize)> {
        expected
            .iter()
            .map(|(focus, context, count)| (focus.to_string(), context.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_wordcontext_small_documents() {
        assert!(tsvector_to_wordcontext("aaa:1", 5, 1).is_empty());
        assert_eq!(
            tsvector_to_wordcontext("aaa:1 bbb:2", 5, 1),
            triples(&[("aaa", "bbb", 1), ("bbb", "aaa", 1)])
        );
    }

    #[test]
    fn test_wordcontext_unigrams() {
        assert_eq!(
            tsvector_to_wordcontext("aaa:1 bbb:2 ccc:3 ddd:4 eee:5", 1, 2),
            triples(&[
                ("aaa", "bbb", 1),
                ("aaa", "ccc", 1),
                ("bbb", "aaa", 1),
                ("bbb", "ccc", 1),
                ("bbb", "ddd", 1),
                ("ccc", "aaa", 1),
                ("ccc", "bbb", 1),
                ("ccc", "ddd", 1),
                ("ccc", "eee", 1),
                ("ddd", "bbb", 1),
                ("ddd", "ccc", 1),
                ("ddd", "eee", 1),
                ("eee", "ccc", 1),
                ("eee", "ddd", 1),
            ])
        );
    }

    #[test]
    fn test_wordcontext_ignores_removed_positions() {
        assert_eq!(
            tsvector_to_wordcontext("aaa:1 ccc:3 ddd:4 eee:5", 2, 2),
            tsvector_to_wordcontext("aaa:1 ccc:2 ddd:3 eee:4", 2, 2)
        );
    }

    #[test]
    fn test_wordcontext_counts_repeated_words() {
        let tsv = "fancy:1 apple:2 pie:3 crust:4 delicious:8 fancy:9 pie:10 eat:15 love:17 pie:18";
        assert_eq!(
            tsvector_to_wordcontext(tsv, 2, 2),
            triples(&[
                ("fancy", "apple", 1),
                ("fancy", "pie", 2),
                ("fancy", "crust", 1),
                ("fancy", "delicious", 1),
                ("fancy", "eat", 1),
                ("fancy apple", "pie", 1),
                ("fancy apple", "crust", 1),
                ("apple", "fancy", 1),
                ("apple", "pie", 1),
                ("apple", "crust", 1),
                ("apple pie", "fancy", 1),
                ("apple pie", "crust", 1),
                ("apple pie", "delicious", 1),
                ("pie", "fancy", 2),
                ("pie", "apple", 1),
                ("pie", "crust", 1),
                ("pie", "delicious", 2),
                ("pie", "eat", 2),
                ("pie", "love", 2),
                ("pie crust", "fancy", 2),
                ("pie crust", "apple", 1),
                ("pie crust", "delicious", 1),
                ("crust", "apple", 1),
                ("crust", "pie", 1),
                ("crust", "delicious", 1),
                ("crust", "fancy", 1),
                ("crust delicious", "apple", 1),
                ("crust delicious", "pie", 2),
                ("crust delicious", "fancy", 1),
                ("delicious", "pie", 2),
                ("delicious", "crust", 1),
                ("delicious", "fancy", 1),
                ("delicious fancy", "pie", 2),
                ("delicious fancy", "crust", 1),
                ("delicious fancy", "eat", 1),
                ("fancy pie", "crust", 1),
                ("fancy pie", "delicious", 1),
                ("fancy pie", "eat", 1),
                ("fancy pie", "love", 1),
                ("pie eat", "delicious", 1),
                ("pie eat", "fancy", 1),
                ("pie eat", "love", 1),
                ("pie eat", "pie", 1),
                ("eat", "fancy", 1),
                ("eat", "pie", 2),
                ("eat", "love", 1),
                ("eat love", "fancy", 1),
                ("eat love", "pie", 2),
                ("love", "pie", 2),
                ("love", "eat", 1),
                ("love pie", "pie", 1),
                ("love pie", "eat", 1),
            ])
        );
    }

    #[test]
    fn test_uniq_keeps_first_occurrence() {
        assert_eq!(
            tsvector_to_ngrams(PIE, 1, true),
            vec!["fanci", "appl", "pie", "crust", "delici", "ever", "love", "eaten"]
        );
        assert!(tsvector_to_ngrams("", 3, true).is_empty());
    }
}
