#![allow(dead_code)]
//! Shared fixtures for the `chajda` integration tests.

use chajda::lexer::simplify::simplify;
use chajda::nlp::{lemmatizer::SurfaceLemmatizer, synonyms::SynonymAugmenter};
use chajda::*;

pub fn lemmatizer() -> SurfaceLemmatizer {
    SurfaceLemmatizer::new().with_lemmas([
        ("united", "unite"),
        ("states", "state"),
        ("running", "run"),
        ("automobiles", "automobile"),
    ])
}

pub fn augmenter() -> SynonymAugmenter {
    SynonymAugmenter::new()
        .with_synonyms("en", "original", ["syn1", "syn2"])
        .with_synonyms("en", "car", ["car", "automobiles", "motor vehicle", "c"])
}

pub fn compile_ok(query: &str) -> CompiledQuery {
    compile("en", query, None, &Config::default(), &lemmatizer()).unwrap()
}

pub fn compile_augmented(query: &str) -> CompiledQuery {
    compile(
        "en",
        query,
        Some(&augmenter()),
        &Config::default(),
        &lemmatizer(),
    )
    .unwrap()
}

pub fn match_expression(query: &str) -> String {
    compile_ok(query).match_expression
}

pub fn simplified(query: &str) -> Node {
    simplify(parse(query).unwrap())
}

pub fn not_n(node: Node, n: usize) -> Node {
    (0..n).fold(node, |node, _| node.not())
}
