//! Generic searches over the syntax tree.

use crate::tree::Node;

/// Finds the first descendant of `root` (pre-order, leftmost first, `root`
/// itself excluded) for which `predicate` yields a value.
///
/// The typed accessors on [`Node`] work directly as predicates:
///
/// ```
/// use enumconv_syntax::{Node, find_descendant, parse_source};
///
/// let file = parse_source("enum E { case a }").unwrap();
/// let element = find_descendant(Node::from(&file), Node::as_enum_case_element);
/// assert_eq!(element.map(|e| e.name.as_str()), Some("a"));
/// ```
pub fn find_descendant<'a, T, F>(root: Node<'a>, mut predicate: F) -> Option<T>
where
    F: FnMut(Node<'a>) -> Option<T>,
{
    fn visit<'a, T>(node: Node<'a>, predicate: &mut dyn FnMut(Node<'a>) -> Option<T>) -> Option<T> {
        node.children().into_iter().find_map(|child| {
            predicate(child).or_else(|| visit(child, &mut *predicate))
        })
    }
    visit(root, &mut predicate)
}

/// Every descendant of `root` in the order [`find_descendant`] visits them.
pub fn descendants(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack: Vec<Node<'_>> = root.children().into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children().into_iter().rev());
    }
    out
}
