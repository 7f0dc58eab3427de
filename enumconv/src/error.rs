use std::path::PathBuf;

use enumconv_syntax::{ParseError, Position};

/// Errors produced by a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input could not be read or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The input contains no `enum` declaration.
    #[error("no enum declaration found in input")]
    NoUnionDeclaration,

    /// A case uses a payload form the converter does not support.
    #[error("{position}: case '{variant}' is not supported: {reason}")]
    UnsupportedGrammar {
        /// The offending case.
        variant: String,
        /// What is unsupported about it.
        reason: String,
        /// Location of the payload entry.
        position: Position,
    },

    /// A computed property has no declared type.
    #[error("{position}: property '{property}' has no type annotation")]
    MissingTypeAnnotation {
        /// The property name.
        property: String,
        /// Location of the `var` keyword.
        position: Position,
    },

    /// A property's switch has no arm for one of the cases.
    #[error("{position}: property '{property}' does not handle case '{variant}'")]
    NonExhaustiveMatch {
        /// The property name.
        property: String,
        /// The case without an arm.
        variant: String,
        /// Location of the property's `var` keyword.
        position: Position,
    },

    /// The arm for a case does not return a value.
    #[error("{position}: property '{property}' has no return expression for case '{variant}'")]
    NoReturnExpression {
        /// The property name.
        property: String,
        /// The case whose arm has no return.
        variant: String,
        /// Location of the arm.
        position: Position,
    },

    /// An arm names a case the enum does not declare.
    #[error("{position}: property '{property}' matches unknown case '{variant}'")]
    UnknownVariant {
        /// The property name.
        property: String,
        /// The undeclared case name.
        variant: String,
        /// Location of the arm.
        position: Position,
    },

    /// Two arms of one property name the same case.
    #[error("{position}: property '{property}' matches case '{variant}' more than once")]
    DuplicateArm {
        /// The property name.
        property: String,
        /// The repeated case name.
        variant: String,
        /// Location of the second arm.
        position: Position,
    },

    /// Converter options could not be decoded.
    #[error("invalid converter options: {0}")]
    Options(#[from] serde_json::Error),

    /// An options file could not be read.
    #[error("failed to read options '{}': {source}", path.display())]
    OptionsIo {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
