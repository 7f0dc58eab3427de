//! Rewrites Swift-only lexical forms into text `proc-macro2` can tokenize.
//!
//! The masked text keeps every newline and the number of characters on every
//! line, so a token's line and column point straight back into the original
//! source, which is where spellings and trivia are read from.
//!
//! - Comments become blanks.
//! - A string literal becomes one literal token per run of text between
//!   interpolations. The code inside `\( … )` is masked like any other code.
//! - Backticks around an identifier become `_`.
//! - A key-path backslash becomes a blank.

use crate::error::ParseError;
use crate::source_map::Position;

/// Masks `text` as described in the module documentation.
pub(crate) fn mask(text: &str) -> Result<String, ParseError> {
    let mut masker = Masker {
        chars: text.chars().collect(),
        pos: 0,
        out: String::with_capacity(text.len()),
    };
    masker.code(false)?;
    Ok(masker.out)
}

struct Masker {
    chars: Vec<char>,
    pos: usize,
    out: String,
}

/// Stand-in for a character inside a comment.
const fn blank(c: char) -> char {
    if c == '\n' { c } else { ' ' }
}

/// Stand-in for a character inside a string literal.
const fn filler(c: char) -> char {
    if c == '\n' { c } else { 'x' }
}

impl Masker {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek(i) == Some(c))
    }

    fn push(&mut self, c: char) {
        self.out.push(c);
        self.pos += 1;
    }

    fn position(&self, index: usize) -> Position {
        let before = &self.chars[..index];
        Position {
            line: before.iter().filter(|&&c| c == '\n').count() + 1,
            column: before.iter().rev().take_while(|&&c| c != '\n').count() + 1,
        }
    }

    fn unterminated(&self, what: &str, start: usize) -> ParseError {
        ParseError::Lex {
            message: format!("unterminated {what}"),
            position: self.position(start),
        }
    }

    /// Number of `#` before a raw string's opening quote, if one starts here.
    fn raw_string_hashes(&self) -> Option<usize> {
        let hashes = self.chars[self.pos..]
            .iter()
            .take_while(|&&c| c == '#')
            .count();
        (self.peek(hashes) == Some('"')).then_some(hashes)
    }

    /// Masks code up to the end of input or, inside an interpolation, up to
    /// the `)` that closes it, which is left unconsumed.
    fn code(&mut self, interpolation: bool) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(c) = self.peek(0) {
            match c {
                '/' if self.peek(1) == Some('/') => self.line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment(),
                '"' => self.string(0)?,
                '#' => match self.raw_string_hashes() {
                    Some(hashes) => self.string(hashes)?,
                    None => self.push(c),
                },
                '`' => self.push('_'),
                '\\' => self.push(' '),
                '(' => {
                    depth += 1;
                    self.push(c);
                }
                ')' if interpolation && depth == 0 => return Ok(()),
                ')' => {
                    depth = depth.saturating_sub(1);
                    self.push(c);
                }
                _ => self.push(c),
            }
        }
        Ok(())
    }

    fn line_comment(&mut self) {
        while let Some(c) = self.peek(0).filter(|&c| c != '\n') {
            self.push(blank(c));
        }
    }

    /// Swift block comments nest.
    fn block_comment(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek(0) {
            if self.at("/*") {
                depth += 1;
                self.push(' ');
                self.push(' ');
            } else if self.at("*/") {
                depth -= 1;
                self.push(' ');
                self.push(' ');
                if depth == 0 {
                    return;
                }
            } else {
                self.push(blank(c));
            }
        }
    }

    /// Masks a string literal whose opening delimiter follows `hashes` `#`.
    fn string(&mut self, hashes: usize) -> Result<(), ParseError> {
        let opening = self.pos;
        let quote = if self.chars[self.pos + hashes..].starts_with(&['"'; 3]) {
            "\"\"\""
        } else {
            "\""
        };
        let multiline = quote.len() == 3;
        let close = format!("{quote}{}", "#".repeat(hashes));
        let escape = format!("\\{}", "#".repeat(hashes));

        let mut start = self.pos;
        self.pos += hashes + quote.len();
        loop {
            if self.at(&close) {
                self.pos += close.len();
                self.segment(start);
                return Ok(());
            }
            if self.at(&escape) {
                self.pos += escape.len();
                if self.peek(0) == Some('(') {
                    self.segment(start);
                    let interpolation = self.pos;
                    self.push('(');
                    self.code(true)?;
                    if self.peek(0) != Some(')') {
                        return Err(self.unterminated("string interpolation", interpolation));
                    }
                    self.push(')');
                    start = self.pos;
                } else if self.peek(0).is_some() {
                    self.pos += 1;
                }
                continue;
            }
            match self.peek(0) {
                None => return Err(self.unterminated("string literal", opening)),
                Some('\n') if !multiline => {
                    return Err(self.unterminated("string literal", opening));
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Writes the characters from `start` to the current position as one
    /// literal token of the same width: `0` for a single character, a quoted
    /// string otherwise. Leading newlines stay outside the token.
    fn segment(&mut self, start: usize) {
        let chars = &self.chars[start..self.pos];
        let lead = chars.iter().take_while(|&&c| c == '\n').count();
        self.out.extend(&chars[..lead]);
        match &chars[lead..] {
            [] => {}
            [_] => self.out.push('0'),
            [_, inner @ .., _] => {
                self.out.push('"');
                self.out.extend(inner.iter().map(|&c| filler(c)));
                self.out.push('"');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain(r#"a + "text""#, r#"a + "xxxx""#)]
    #[case::escaped_quote(r#""a\"b" + c"#, r#""xxxx" + c"#)]
    #[case::interpolation(r#""Pro: \(s)""#, r#""xxxxx"(s)0"#)]
    #[case::nested_interpolation(r#""\(f("\(x)"))!""#, r#"""(f(""(x)0))"""#)]
    #[case::raw(r##"#"a\(b)"#"##, r##""xxxxxxx""##)]
    #[case::raw_interpolation(r##"#"a\#(b)"#"##, r##""xxx"(b)"""##)]
    #[case::backticks("`default` + 1", "_default_ + 1")]
    #[case::key_path(r"\.name", " .name")]
    fn masks(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(mask(text).unwrap(), expected);
    }

    #[rstest]
    #[case::line("a /// doc\nb", "/// doc")]
    #[case::block_doc("a /** doc */ b", "/** doc */")]
    #[case::nested_block("a /* x /* y */ z */ b", "/* x /* y */ z */")]
    fn comments_become_blanks(#[case] text: &str, #[case] comment: &str) {
        let expected = text.replace(comment, &" ".repeat(comment.len()));
        assert_eq!(mask(text).unwrap(), expected);
    }

    #[test]
    fn multiline_strings_keep_their_lines() {
        let text = "\"\"\"\n\\(a)\nend\n\"\"\"";
        let masked = mask(text).unwrap();
        assert_eq!(masked, "\"xx\n\"(a)\n\"xx\nxx\"");
        assert_eq!(masked.lines().count(), text.lines().count());
    }

    #[test]
    fn line_widths_are_preserved() {
        let text = "let s = \"ç\\(x)é\" // ü\nnext";
        let masked = mask(text).unwrap();
        let widths = |s: &str| s.lines().map(|l| l.chars().count()).collect::<Vec<_>>();
        assert_eq!(widths(&masked), widths(text));
    }

    #[rstest]
    #[case::string("a = \"open\nb", "1:5")]
    #[case::interpolation("a = \"\\(b", "1:7")]
    fn unterminated_literals_fail(#[case] text: &str, #[case] position: &str) {
        let err = mask(text).unwrap_err();
        assert!(matches!(err, ParseError::Lex { .. }));
        assert!(err.to_string().starts_with(position), "{err}");
    }
}
