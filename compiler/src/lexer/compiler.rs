use serde::Serialize;

use crate::{
    chajda_log,
    config::Config,
    lexer::{
        augment::{augment, AugmentedTerms},
        filters::extract_filters,
        lemmas::resolve,
        simplify::simplify,
        tokenizer::parse,
        tsquery::serialize,
        FilterTree, Node, QueryError,
    },
    nlp::{Augmenter, Lemmatizer},
};

/// Everything produced by compiling one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    /// Expression to cast into a postgres `tsquery`, empty when nothing is left to match
    pub match_expression: String,
    /// Synonyms added to each augmented term
    pub augmented_terms: AugmentedTerms,
    /// The metadata filters of the query, if it had any
    pub filter_tree: Option<FilterTree>,
}

///
/// QueryCompiler turns raw search queries into postgres full text search
/// expressions for a single language and configuration.
///
/// This struct handles the complete pipeline from a raw query string by:
/// 1. Parsing the input query string into a syntax tree
/// 2. Simplifying redundant negations and nested conjunctions
/// 3. Lemmatizing every search term with the provided [`Lemmatizer`]
/// 4. Augmenting single terms with synonyms, if an [`Augmenter`] was provided
/// 5. Serializing the tree into the match expression and extracting the filters
///
/// The compiler holds no mutable state, so one instance may serve many queries
/// as long as the collaborators allow it.
pub struct QueryCompiler<'a> {
    lang: &'a str,
    config: &'a Config,
    lemmatizer: &'a dyn Lemmatizer,
    augmenter: Option<&'a dyn Augmenter>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(lang: &'a str, config: &'a Config, lemmatizer: &'a dyn Lemmatizer) -> Self {
        QueryCompiler {
            lang,
            config,
            lemmatizer,
            augmenter: None,
        }
    }

    /// Enable augmentation; lexemes in the output will carry `:A`/`:B` weights
    pub fn with_augmenter(mut self, augmenter: &'a dyn Augmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    pub fn compile(&self, query: &str) -> Result<CompiledQuery, QueryError> {
        let tree = parse(query)?;
        self.compile_tree(tree)
    }

    /// Run every stage after parsing on an already built syntax tree
    pub fn compile_tree(&self, tree: Node) -> Result<CompiledQuery, QueryError> {
        let tree = simplify(tree);
        let Some(tree) = resolve(tree, self.lang, self.config, self.lemmatizer)? else {
            chajda_log!(debug, "Compiler", self.lang, "Every term was removed by lemmatization");
            return Ok(CompiledQuery::default());
        };

        let (tree, augmented_terms) = match self.augmenter {
            Some(augmenter) => augment(tree, self.lang, self.config, self.lemmatizer, augmenter),
            None => (tree, AugmentedTerms::new()),
        };
        chajda_log!(debug, "Compiler", self.lang, "AST={}", tree);

        let match_expression = serialize(&tree, self.augmenter.is_some());
        let filter_tree = extract_filters(&tree);
        chajda_log!(debug, "Compiler", self.lang, "tsquery={:?}", match_expression);

        Ok(CompiledQuery {
            match_expression,
            augmented_terms,
            filter_tree,
        })
    }
}
