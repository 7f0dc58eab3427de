//! Parser and syntax tree for the subset of Swift that `enumconv` rewrites:
//! `enum` declarations with `case` lines and computed `var` properties.
//!
//! Source text is tokenized with `proc-macro2` and read with `syn` parse
//! streams. The resulting [`SourceFile`] is a closed tree of typed nodes that
//! [`find_descendant`] can search.
//!
//! Swift spellings that Rust's token rules reject (string interpolation, raw
//! and multi-line strings, backtick-escaped identifiers, key paths, nested
//! comments) are masked to same-width stand-ins before tokenizing. Every
//! spelling in the tree is read back from the original text.

mod error;
pub mod expr;
mod mask;
mod parser;
pub mod query;
mod source_map;
pub mod tree;

use std::path::Path;

use proc_macro2::TokenStream;
use tracing::debug;

pub use error::ParseError;
pub use expr::{Expr, ExprGroup, ExprRole, Expression, Leaf};
pub use query::{descendants, find_descendant};
pub use source_map::Position;
pub use tree::*;

use source_map::SourceMap;

/// Parses Swift source text.
///
/// Token locations are resolved while parsing and the thread's `proc-macro2`
/// span table is cleared afterwards, so any `proc_macro2::Span` created on
/// this thread before the call can no longer report its location.
pub fn parse_source(text: &str) -> Result<SourceFile, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let file = tokenize_and_parse(text);
    proc_macro2::extra::invalidate_current_thread_spans();
    let file = file?;
    debug!(declarations = file.declarations.len(), "parsed source");
    Ok(file)
}

fn tokenize_and_parse(text: &str) -> Result<SourceFile, ParseError> {
    let tokens: TokenStream = mask::mask(text)?.parse()?;
    let map = SourceMap::new(text);
    Ok(parser::parse_tokens(tokens, &map)?)
}

/// Reads and parses a Swift source file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<SourceFile, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(&text)
}
