//! Converts a Swift `enum` whose computed properties switch over `self` into
//! a `struct` with one stored field per property and one static factory per
//! case.
//!
//! ```
//! let source = r#"
//! enum Test {
//! case beginner
//!
//! var text: String {
//! switch self {
//! case .beginner:
//! return "a beginner"
//! }
//! }
//! }
//! "#;
//! let expected = "struct Test {\nvar text: String\n\nstatic var beginner: Test {\nreturn .init(text: \"a beginner\")\n}\n}\n";
//! assert_eq!(enumconv::convert_union_to_record(source).unwrap(), expected);
//! ```
//!
//! The pipeline is parse ([`enumconv_syntax`]), collect ([`collect()`]), lower
//! ([`model::Union::emit`]) and render ([`codegen`]).

pub mod codegen;
pub mod collect;
pub mod config;
pub mod decl;
mod error;
pub mod model;
pub mod rewrite;

use std::path::Path;

use enumconv_syntax::SourceFile;
use tracing::info;

pub use collect::collect;
pub use config::{ConvertOptions, FactoryPlacement, FieldKeyword, ReturnStyle};
pub use error::ConvertError;

/// Runs conversions with a fixed set of options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// A converter using `options`.
    pub const fn new(options: ConvertOptions) -> Self {
        Converter { options }
    }

    /// The options this converter renders with.
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts Swift source text.
    pub fn convert_str(&self, source: &str) -> Result<String, ConvertError> {
        let file = enumconv_syntax::parse_source(source)?;
        self.convert_tree(&file)
    }

    /// Reads and converts a Swift source file.
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<String, ConvertError> {
        let path = path.as_ref();
        info!(path = %path.display(), "converting file");
        let file = enumconv_syntax::parse_file(path)?;
        self.convert_tree(&file)
    }

    /// Converts an already parsed file.
    pub fn convert_tree(&self, file: &SourceFile) -> Result<String, ConvertError> {
        let union = collect(file)?;
        info!(
            name = %union.name,
            variants = union.variants.len(),
            properties = union.properties.len(),
            "converting enum"
        );
        let record = union.emit()?;
        Ok(codegen::render(&record, self.options()))
    }
}

/// Converts Swift source text with default options.
pub fn convert_union_to_record(source: &str) -> Result<String, ConvertError> {
    Converter::default().convert_str(source)
}

/// Reads and converts a Swift source file with default options.
pub fn convert_union_to_record_file(path: impl AsRef<Path>) -> Result<String, ConvertError> {
    Converter::default().convert_file(path)
}
