use std::collections::BTreeMap;

use crate::{
    chajda_log,
    config::Config,
    lexer::Node,
    nlp::{Augmenter, Lemmatizer},
};

/// Type alias for the words that were augmented: BTreeMap<term, Vec<synonym>>
pub type AugmentedTerms = BTreeMap<String, Vec<String>>;

/// Replaces every single-word `Term` that has usable synonyms with an
/// `Augment` node, returning the new tree and the synonyms that were added
/// for each term. Phrases, filters and existing `Augment` nodes are kept as-is.
pub fn augment<L, A>(
    node: Node,
    lang: &str,
    config: &Config,
    lemmatizer: &L,
    augmenter: &A,
) -> (Node, AugmentedTerms)
where
    L: Lemmatizer + ?Sized,
    A: Augmenter + ?Sized,
{
    let mut stage = Augmentation {
        lang,
        config,
        lemmatizer,
        augmenter,
        terms: AugmentedTerms::new(),
    };
    let node = stage.visit(node);
    (node, stage.terms)
}

struct Augmentation<'a, L: ?Sized, A: ?Sized> {
    lang: &'a str,
    config: &'a Config,
    lemmatizer: &'a L,
    augmenter: &'a A,
    terms: AugmentedTerms,
}

impl<'a, L, A> Augmentation<'a, L, A>
where
    L: Lemmatizer + ?Sized,
    A: Augmenter + ?Sized,
{
    fn visit(&mut self, node: Node) -> Node {
        match node {
            Node::Or(children) => Node::Or(self.visit_all(children)),
            Node::And(children) => Node::And(self.visit_all(children)),
            Node::Not(inner) => self.visit(*inner).not(),
            Node::Term(word) => self.augment_term(word),
            other => other,
        }
    }

    fn visit_all(&mut self, children: Vec<Node>) -> Vec<Node> {
        children.into_iter().map(|child| self.visit(child)).collect()
    }

    fn augment_term(&mut self, word: String) -> Node {
        let mut synonyms: Vec<String> = Vec::new();
        for candidate in self.augmenter.augment(self.lang, &word, self.config) {
            match self
                .lemmatizer
                .lemmatize(self.lang, &candidate, false, self.config)
            {
                Some(mut lemmas) if lemmas.len() == 1 => {
                    let lemma = lemmas.remove(0).lemma;
                    if lemma != word && !synonyms.contains(&lemma) {
                        synonyms.push(lemma);
                    }
                }
                Some(lemmas) if lemmas.is_empty() => {}
                Some(_) => {
                    chajda_log!(
                        debug,
                        "Augment",
                        self.lang,
                        "Dropping multi-word synonym {:?} for {:?}",
                        candidate,
                        word
                    );
                }
                None => {
                    chajda_log!(
                        warn,
                        "Augment",
                        self.lang,
                        "Lemmatizer failed on synonym {:?} for {:?}",
                        candidate,
                        word
                    );
                }
            }
        }

        if synonyms.is_empty() {
            return Node::Term(word);
        }
        self.terms.insert(word.clone(), synonyms.clone());
        Node::Augment {
            original: word,
            synonyms,
        }
    }
}
