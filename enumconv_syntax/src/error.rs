use std::path::PathBuf;

use crate::source_map::Position;

/// Errors produced while turning source text into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The text could not be split into tokens (unbalanced delimiters,
    /// unterminated literals, characters the tokenizer does not know).
    #[error("{position}: cannot tokenize input: {message}")]
    Lex {
        /// Tokenizer diagnostic.
        message: String,
        /// Where tokenizing stopped.
        position: Position,
    },

    /// The tokens do not form a declaration of the supported grammar.
    #[error("{position}: {message}")]
    Syntax {
        /// Parser diagnostic.
        message: String,
        /// Location of the offending token.
        position: Position,
    },

    /// The source file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl From<syn::Error> for ParseError {
    fn from(error: syn::Error) -> Self {
        ParseError::Syntax {
            message: error.to_string(),
            position: Position::of(error.span()),
        }
    }
}

impl From<proc_macro2::LexError> for ParseError {
    fn from(error: proc_macro2::LexError) -> Self {
        ParseError::Lex {
            message: error.to_string(),
            position: Position::of(error.span()),
        }
    }
}
