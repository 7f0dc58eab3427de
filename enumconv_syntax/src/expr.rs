//! Expression trees.
//!
//! Expressions are kept as token trees rather than a full operator grammar:
//! the converter only needs to find identifier references and to print the
//! expression back exactly as it was written. Every leaf remembers the source
//! text that preceded it (whitespace and comments), so rendering an
//! expression reproduces its original spelling.

use std::fmt;

use proc_macro2::{Delimiter, TokenTree};

use crate::source_map::SourceMap;

/// Words that can never be an identifier reference.
const KEYWORDS: &[&str] = &[
    "Any", "Self", "as", "await", "break", "case", "catch", "continue", "default", "defer", "do",
    "else", "fallthrough", "false", "for", "guard", "if", "in", "init", "is", "let", "nil",
    "repeat", "rethrows", "return", "self", "super", "switch", "throw", "throws", "true", "try",
    "var", "where", "while",
];

/// One token of source, with the text that separated it from the previous token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Exact spelling of the token.
    pub text: String,
    /// Source text between the previous token and this one.
    pub trivia: String,
}

impl Leaf {
    /// A leaf with no leading trivia.
    pub fn new(text: impl Into<String>) -> Self {
        Leaf {
            text: text.into(),
            trivia: String::new(),
        }
    }
}

/// A delimited sub-expression: `( … )`, `[ … ]` or `{ … }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprGroup {
    /// Which delimiters enclose the group.
    pub delimiter: Delimiter,
    /// Source text before the opening delimiter.
    pub trivia: String,
    /// Contents of the group.
    pub items: Vec<Expr>,
    /// Source text before the closing delimiter.
    pub close_trivia: String,
}

/// An expression node, classified by its syntactic role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A bare identifier referring to a binding.
    Reference(Leaf),
    /// A member name following `.`.
    Member(Leaf),
    /// An argument label inside call parentheses (`name:`).
    Label(Leaf),
    /// A language keyword (`self`, `nil`, `init`, …).
    Keyword(Leaf),
    /// A string or number literal.
    Literal(Leaf),
    /// A single punctuation character.
    Punct(Leaf),
    /// A delimited group.
    Group(ExprGroup),
}

/// Syntactic role of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprRole {
    /// See [`Expr::Reference`].
    Reference,
    /// See [`Expr::Member`].
    Member,
    /// See [`Expr::Label`].
    Label,
    /// See [`Expr::Keyword`].
    Keyword,
    /// See [`Expr::Literal`].
    Literal,
    /// See [`Expr::Punct`].
    Punct,
    /// See [`Expr::Group`].
    Group,
}

impl Expr {
    /// The role this node plays in its expression.
    pub const fn role(&self) -> ExprRole {
        match self {
            Expr::Reference(_) => ExprRole::Reference,
            Expr::Member(_) => ExprRole::Member,
            Expr::Label(_) => ExprRole::Label,
            Expr::Keyword(_) => ExprRole::Keyword,
            Expr::Literal(_) => ExprRole::Literal,
            Expr::Punct(_) => ExprRole::Punct,
            Expr::Group(_) => ExprRole::Group,
        }
    }

    /// The leaf behind this node, if it is not a group.
    pub const fn leaf(&self) -> Option<&Leaf> {
        match self {
            Expr::Reference(leaf)
            | Expr::Member(leaf)
            | Expr::Label(leaf)
            | Expr::Keyword(leaf)
            | Expr::Literal(leaf)
            | Expr::Punct(leaf) => Some(leaf),
            Expr::Group(_) => None,
        }
    }

    fn is_punct(&self, c: char) -> bool {
        matches!(self, Expr::Punct(leaf) if leaf.text.len() == 1 && leaf.text.starts_with(c))
    }
}

/// A complete expression as a sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    /// Top-level nodes in source order.
    pub items: Vec<Expr>,
}

impl Expression {
    /// Whether the expression has no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the expression is exactly the implicit receiver `self`.
    pub fn is_self(&self) -> bool {
        matches!(self.items.as_slice(), [Expr::Keyword(leaf)] if leaf.text == "self")
    }

    /// Names of every identifier reference, in source order, including
    /// references nested in groups.
    pub fn references(&self) -> Vec<&str> {
        fn walk<'e>(items: &'e [Expr], out: &mut Vec<&'e str>) {
            for item in items {
                match item {
                    Expr::Reference(leaf) => out.push(&leaf.text),
                    Expr::Group(group) => walk(&group.items, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }

    /// Builds an expression from tokens, recovering trivia from the source.
    pub(crate) fn from_tokens(tokens: &[TokenTree], map: &SourceMap<'_>) -> Self {
        let mut prev_end = None;
        Expression {
            items: build(tokens, map, &mut prev_end, false),
        }
    }
}

/// Whether the next identifier is a member name: the last node is a `.` that
/// does not end an operator such as `...`.
fn member_access(items: &[Expr]) -> bool {
    match items {
        [.., before, dot] if dot.is_punct('.') => {
            !(before.is_punct('.') && dot.leaf().is_some_and(|leaf| leaf.trivia.is_empty()))
        }
        [dot] => dot.is_punct('.'),
        _ => false,
    }
}

fn build(
    tokens: &[TokenTree],
    map: &SourceMap<'_>,
    prev_end: &mut Option<usize>,
    in_parens: bool,
) -> Vec<Expr> {
    let mut items: Vec<Expr> = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let start = map.start_of(token.span());
        let trivia = prev_end
            .map(|end| map.slice(end, start).to_string())
            .unwrap_or_default();

        let item = match token {
            TokenTree::Group(group) => {
                *prev_end = Some(map.end_of(group.span_open()));
                let inner: Vec<TokenTree> = group.stream().into_iter().collect();
                let children = build(
                    &inner,
                    map,
                    prev_end,
                    group.delimiter() == Delimiter::Parenthesis,
                );
                let close_start = map.start_of(group.span_close());
                let close_trivia = prev_end
                    .map(|end| map.slice(end, close_start).to_string())
                    .unwrap_or_default();
                *prev_end = Some(map.end_of(group.span_close()));
                Expr::Group(ExprGroup {
                    delimiter: group.delimiter(),
                    trivia,
                    items: children,
                    close_trivia,
                })
            }
            TokenTree::Ident(ident) => {
                let end = map.end_of(token.span());
                *prev_end = Some(end);
                let leaf = Leaf {
                    text: map.slice(start, end).to_string(),
                    trivia,
                };
                let name = ident.to_string();
                let after_dot = member_access(&items);
                let starts_element = index == 0 || items.last().is_some_and(|prev| prev.is_punct(','));
                let before_colon = matches!(tokens.get(index + 1), Some(TokenTree::Punct(p)) if p.as_char() == ':')
                    && !matches!(tokens.get(index + 2), Some(TokenTree::Punct(p)) if p.as_char() == ':');
                if after_dot {
                    Expr::Member(leaf)
                } else if KEYWORDS.contains(&name.as_str()) {
                    Expr::Keyword(leaf)
                } else if in_parens && starts_element && before_colon {
                    Expr::Label(leaf)
                } else {
                    Expr::Reference(leaf)
                }
            }
            TokenTree::Punct(_) | TokenTree::Literal(_) => {
                let end = map.end_of(token.span());
                *prev_end = Some(end);
                let leaf = Leaf {
                    text: map.slice(start, end).to_string(),
                    trivia,
                };
                if matches!(token, TokenTree::Literal(_)) {
                    Expr::Literal(leaf)
                } else {
                    Expr::Punct(leaf)
                }
            }
        };
        items.push(item);
    }
    items
}

fn delimiters(delimiter: Delimiter) -> (&'static str, &'static str) {
    match delimiter {
        Delimiter::Parenthesis => ("(", ")"),
        Delimiter::Bracket => ("[", "]"),
        Delimiter::Brace => ("{", "}"),
        Delimiter::None => ("", ""),
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for item in items {
        match item {
            Expr::Group(group) => {
                let (open, close) = delimiters(group.delimiter);
                write!(f, "{}{}", group.trivia, open)?;
                write_items(f, &group.items)?;
                write!(f, "{}{}", group.close_trivia, close)?;
            }
            other => {
                if let Some(leaf) = other.leaf() {
                    write!(f, "{}{}", leaf.trivia, leaf.text)?;
                }
            }
        }
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_items(f, &self.items)
    }
}
