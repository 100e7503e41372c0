use crate::lexer::Node;

/// Rewrites a parsed tree into its canonical shape.
///
/// - `Not(Not(x))` becomes `x`, so an even run of negations cancels out and an
///   odd run leaves a single `Not`.
/// - An `And` directly inside an `And` is spliced into its parent, keeping the
///   left-to-right order of the operands.
///
/// `Or` chains are left nested as written. Children are simplified before their
/// parent, so a single bottom-up pass reaches the fixed point.
pub fn simplify(node: Node) -> Node {
    match node {
        Node::Not(inner) => match simplify(*inner) {
            Node::Not(cancelled) => *cancelled,
            other => Node::Not(Box::new(other)),
        },
        Node::And(children) => {
            let mut flattened = Vec::with_capacity(children.len());
            for child in children.into_iter().map(simplify) {
                match child {
                    Node::And(nested) => flattened.extend(nested),
                    other => flattened.push(other),
                }
            }
            Node::And(flattened)
        }
        Node::Or(children) => Node::Or(children.into_iter().map(simplify).collect()),
        leaf => leaf,
    }
}
