use crate::lexer::Node;

/// Weight label of the words the user typed
pub const WEIGHT_ORIGINAL: &str = "A";
/// Weight label of the synonyms added by augmentation
pub const WEIGHT_SYNONYM: &str = "B";

/// Flattens a tree into a string that can be cast into postgres' `tsquery`.
///
/// Operands are joined with `&` and `|`, negation is a `!` prefix, phrases
/// use the `<N>` distance operator and, when `weighted`, every lexeme carries a
/// `:A` (typed) or `:B` (synonym) label. Filters render as nothing and are
/// left out of the operator they belong to. A tree with nothing to match
/// renders as the empty string.
pub fn serialize(node: &Node, weighted: bool) -> String {
    strip_redundant_parens(render(node, weighted, true))
}

fn render(node: &Node, weighted: bool, root: bool) -> String {
    match node {
        Node::Or(children) => render_operands(children, " | ", weighted, root),
        Node::And(children) => render_operands(children, " & ", weighted, root),
        Node::Not(inner) => {
            let inner = render(inner, weighted, false);
            if inner.is_empty() {
                inner
            } else {
                format!("!{}", inner)
            }
        }
        Node::Term(text) => weigh(text, weighted.then_some(WEIGHT_ORIGINAL)),
        Node::Phrase { lemmas, gaps } => render_phrase(lemmas, gaps, weighted),
        Node::Augment { original, synonyms } => render_augment(original, synonyms),
        Node::Filter { .. } => String::new(),
    }
}

fn render_operands(children: &[Node], separator: &str, weighted: bool, root: bool) -> String {
    let mut parts: Vec<String> = children
        .iter()
        .map(|child| render(child, weighted, false))
        .filter(|part| !part.is_empty())
        .collect();

    match parts.len() {
        0 => String::new(),
        1 => parts.remove(0),
        _ if root => parts.join(separator),
        _ => format!("({})", parts.join(separator)),
    }
}

fn render_phrase(lemmas: &[String], gaps: &[usize], weighted: bool) -> String {
    let weight = weighted.then_some(WEIGHT_ORIGINAL);
    let Some(first) = lemmas.first() else {
        return String::new();
    };

    let mut ret = weigh(first, weight);
    for (i, lemma) in lemmas.iter().enumerate().skip(1) {
        let distance = gaps.get(i - 1).copied().unwrap_or(0) + 1;
        ret.push_str(&format!(" <{}> {}", distance, weigh(lemma, weight)));
    }
    if lemmas.len() > 1 {
        ret = format!("({})", ret);
    }
    ret
}

fn render_augment(original: &str, synonyms: &[String]) -> String {
    let original = weigh(original, Some(WEIGHT_ORIGINAL));
    if synonyms.is_empty() {
        return original;
    }

    let mut parts = Vec::with_capacity(synonyms.len() + 1);
    parts.push(original);
    parts.extend(
        synonyms
            .iter()
            .map(|synonym| weigh(synonym, Some(WEIGHT_SYNONYM))),
    );
    format!("({})", parts.join(" | "))
}

fn weigh(lexeme: &str, weight: Option<&str>) -> String {
    match weight {
        Some(weight) => format!("{}:{}", lexeme, weight),
        None => lexeme.to_string(),
    }
}

/// Removes one pair of parentheses wrapping the whole expression, but only
/// when the opening parenthesis is closed by the final character.
fn strip_redundant_parens(expr: String) -> String {
    if !(expr.starts_with('(') && expr.ends_with(')')) {
        return expr;
    }

    let mut depth = 0usize;
    for (i, ch) in expr.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i + 1 < expr.len() {
                    return expr;
                }
            }
            _ => {}
        }
    }
    expr[1..expr.len() - 1].to_string()
}
