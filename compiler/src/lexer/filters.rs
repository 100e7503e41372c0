use crate::lexer::{FilterTree, Node};

/// Extracts the `key:value` filters of a tree, keeping the boolean operators
/// that connect them and dropping every search term.
///
/// Operators left without any filter are dropped as well; `None` means the
/// query contained no filters at all.
pub fn extract_filters(node: &Node) -> Option<FilterTree> {
    match node {
        Node::Or(children) => extract_all(children).map(FilterTree::Or),
        Node::And(children) => extract_all(children).map(FilterTree::And),
        Node::Not(inner) => extract_filters(inner).map(|tree| FilterTree::Not(Box::new(tree))),
        Node::Filter { key, value } => Some(FilterTree::filter(key.as_str(), value.as_str())),
        Node::Term(_) | Node::Phrase { .. } | Node::Augment { .. } => None,
    }
}

fn extract_all(children: &[Node]) -> Option<Vec<FilterTree>> {
    let kept: Vec<FilterTree> = children.iter().filter_map(extract_filters).collect();
    (!kept.is_empty()).then_some(kept)
}
