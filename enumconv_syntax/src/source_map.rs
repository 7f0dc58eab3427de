use std::fmt;

use proc_macro2::{Ident, LineColumn, Span, TokenTree};

/// A human-readable location in the parsed source, 1-based on both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column in characters, starting at 1.
    pub column: usize,
}

impl Position {
    /// Position of the first character covered by `span`.
    pub fn of(span: Span) -> Self {
        span.start().into()
    }
}

impl From<LineColumn> for Position {
    fn from(lc: LineColumn) -> Self {
        Position {
            line: lc.line,
            column: lc.column + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps the line/column locations carried by token spans back to byte
/// offsets in the text that was tokenized.
pub(crate) struct SourceMap<'src> {
    text: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> SourceMap<'src> {
    pub(crate) fn new(text: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        SourceMap { text, line_starts }
    }

    /// Byte offset of a span location. Columns count characters, not bytes.
    pub(crate) fn offset(&self, at: LineColumn) -> usize {
        let Some(&start) = self.line_starts.get(at.line.saturating_sub(1)) else {
            return self.text.len();
        };
        self.text[start..]
            .char_indices()
            .nth(at.column)
            .map_or(self.text.len(), |(i, _)| start + i)
    }

    pub(crate) fn start_of(&self, span: Span) -> usize {
        self.offset(span.start())
    }

    pub(crate) fn end_of(&self, span: Span) -> usize {
        self.offset(span.end())
    }

    /// Text between two byte offsets; empty when the range is inverted.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'src str {
        self.text.get(start..end).unwrap_or("")
    }

    /// Source spelling of one identifier, backticks included.
    pub(crate) fn spelling(&self, ident: &Ident) -> String {
        self.slice(self.start_of(ident.span()), self.end_of(ident.span()))
            .to_string()
    }

    /// Exact source spelling of a run of tokens, from the start of the first
    /// to the end of the last.
    pub(crate) fn text_of(&self, tokens: &[TokenTree]) -> String {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => self
                .slice(self.start_of(first.span()), self.end_of(last.span()))
                .to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_count_characters_within_a_line() {
        let map = SourceMap::new("ab\nçd\n");
        assert_eq!(map.offset(LineColumn { line: 1, column: 1 }), 1);
        assert_eq!(map.offset(LineColumn { line: 2, column: 0 }), 3);
        // `ç` is two bytes wide.
        assert_eq!(map.offset(LineColumn { line: 2, column: 1 }), 5);
        assert_eq!(map.offset(LineColumn { line: 9, column: 0 }), 7);
    }

    #[test]
    fn inverted_slice_is_empty() {
        let map = SourceMap::new("hello");
        assert_eq!(map.slice(3, 1), "");
        assert_eq!(map.slice(1, 3), "el");
    }

    #[test]
    fn position_is_one_based() {
        let pos: Position = LineColumn { line: 4, column: 0 }.into();
        assert_eq!(pos.to_string(), "4:1");
    }
}
