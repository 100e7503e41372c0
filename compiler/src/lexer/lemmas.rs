use crate::{
    chajda_log,
    config::Config,
    lexer::{Node, QueryError},
    nlp::{Lemma, Lemmatizer},
};

/// Replaces every raw `Term` with its normalized form.
///
/// A term that lemmatizes to one word stays a `Term`, several words turn into
/// a `Phrase`, and a term made only of removed words is dropped. Quoted
/// literals always become a `Phrase`, so augmentation never touches them. A boolean
/// node left without children is dropped with it, so `None` means nothing of
/// the tree survived. Filters are never touched.
pub fn resolve<L>(
    node: Node,
    lang: &str,
    config: &Config,
    lemmatizer: &L,
) -> Result<Option<Node>, QueryError>
where
    L: Lemmatizer + ?Sized,
{
    match node {
        Node::Or(children) => {
            Ok(resolve_children(children, lang, config, lemmatizer)?.map(Node::Or))
        }
        Node::And(children) => {
            Ok(resolve_children(children, lang, config, lemmatizer)?.map(Node::And))
        }
        Node::Not(inner) => Ok(resolve(*inner, lang, config, lemmatizer)?.map(Node::not)),
        Node::Term(rawterm) => resolve_rawterm(lang, &rawterm, config, lemmatizer),
        normalized => Ok(Some(normalized)),
    }
}

fn resolve_children<L>(
    children: Vec<Node>,
    lang: &str,
    config: &Config,
    lemmatizer: &L,
) -> Result<Option<Vec<Node>>, QueryError>
where
    L: Lemmatizer + ?Sized,
{
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        if let Some(resolved) = resolve(child, lang, config, lemmatizer)? {
            kept.push(resolved);
        }
    }
    Ok((!kept.is_empty()).then_some(kept))
}

/// Lemmatize a single raw term, quoted or not, into a `Term` or `Phrase`
pub fn resolve_rawterm<L>(
    lang: &str,
    rawterm: &str,
    config: &Config,
    lemmatizer: &L,
) -> Result<Option<Node>, QueryError>
where
    L: Lemmatizer + ?Sized,
{
    let text = strip_quotes(rawterm);
    let quoted = text.len() < rawterm.len();
    let mut lemmas = lemmatizer
        .lemmatize(lang, text, true, config)
        .ok_or_else(|| QueryError::NormalizationFailure {
            lang: lang.to_string(),
            text: text.to_string(),
        })?;

    match lemmas.len() {
        0 => {
            chajda_log!(debug, "Lemmas", lang, "Dropping term {:?}, no lemmas left", text);
            Ok(None)
        }
        // a quoted literal stays a phrase even when one word is left
        1 if !quoted => Ok(lemmas.pop().map(|lemma| Node::Term(lemma.lemma))),
        _ => Ok(Some(phrase_from(lemmas))),
    }
}

fn phrase_from(lemmas: Vec<Lemma>) -> Node {
    let gaps = lemmas
        .windows(2)
        .map(|pair| {
            pair[1]
                .position
                .saturating_sub(pair[0].position)
                .saturating_sub(1)
        })
        .collect();
    Node::Phrase {
        lemmas: lemmas.into_iter().map(|lemma| lemma.lemma).collect(),
        gaps,
    }
}

fn strip_quotes(rawterm: &str) -> &str {
    if rawterm.len() >= 2 && rawterm.starts_with('"') && rawterm.ends_with('"') {
        &rawterm[1..rawterm.len() - 1]
    } else {
        rawterm
    }
}
