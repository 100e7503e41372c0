mod common;

use chajda::builder::{QueryBuilder, QueryExpr};
use chajda::{to_tsquery, Config};
use common::*;

#[test]
fn built_query_compiles() {
    let query = QueryBuilder::word("Running")
        .or("travel")
        .phrase("United States")
        .filter("lang", "en")
        .to_query_string()
        .unwrap();
    assert_eq!(query, "(((Running | travel) & \"United States\") & lang:en)");

    let compiled = compile_ok(&query);
    assert_eq!(compiled.match_expression, "(run | travel) & (unite <1> state)");
}

#[test]
fn keywords_as_words_stay_search_terms() {
    let query = QueryExpr::word("or")
        .and(QueryExpr::word("not").not())
        .to_query_string();
    assert_eq!(query, "(\"or\" & !(\"not\"))");
    // "xx" has no stop words to swallow them
    assert_eq!(
        to_tsquery("xx", &query, &Config::default(), &lemmatizer()).unwrap(),
        "or & !not"
    );
}
