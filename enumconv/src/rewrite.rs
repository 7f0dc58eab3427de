//! Renaming of identifier references inside an expression.

use enumconv_syntax::{Expr, ExprGroup, Expression, Leaf};

/// Replaces every reference to one name with another.
///
/// Only [`Expr::Reference`] leaves are touched: member names after `.`,
/// argument labels and keywords keep their spelling, and so does the text
/// around each token. Scopes are not tracked, so a closure parameter that
/// shadows `from` is renamed as well.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierRewriter<'n> {
    from: &'n str,
    to: &'n str,
}

impl<'n> IdentifierRewriter<'n> {
    /// A rewriter turning references to `from` into references to `to`.
    pub const fn new(from: &'n str, to: &'n str) -> Self {
        IdentifierRewriter { from, to }
    }

    /// Returns a rewritten copy of `expression`.
    pub fn rewrite(&self, expression: &Expression) -> Expression {
        Expression {
            items: self.rewrite_items(&expression.items),
        }
    }

    fn rewrite_items(&self, items: &[Expr]) -> Vec<Expr> {
        items.iter().map(|item| self.rewrite_item(item)).collect()
    }

    fn rewrite_item(&self, item: &Expr) -> Expr {
        match item {
            Expr::Reference(leaf) if leaf.text == self.from => Expr::Reference(Leaf {
                text: self.to.to_string(),
                trivia: leaf.trivia.clone(),
            }),
            Expr::Group(group) => Expr::Group(ExprGroup {
                delimiter: group.delimiter,
                trivia: group.trivia.clone(),
                items: self.rewrite_items(&group.items),
                close_trivia: group.close_trivia.clone(),
            }),
            other => other.clone(),
        }
    }
}
