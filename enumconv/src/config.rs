//! Options controlling how the generated record is written.

use std::path::Path;

use contracts::*;
use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// Binding keyword for the record's stored fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKeyword {
    /// `var name: Type`
    #[default]
    Var,
    /// `let name: Type`
    Let,
}

impl FieldKeyword {
    /// The keyword as written in source.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKeyword::Var => "var",
            FieldKeyword::Let => "let",
        }
    }
}

/// How factory bodies hand back the constructed record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStyle {
    /// `return .init(…)`
    #[default]
    Explicit,
    /// `.init(…)` as a single-expression body.
    Implicit,
}

/// Where the factories are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryPlacement {
    /// Inside the record body, after the fields.
    #[default]
    Inline,
    /// In an `extension` of the record following its declaration.
    Extension,
}

/// Configuration for rendering a converted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Spaces per nesting level. Zero writes every line flush left.
    pub indent_width: usize,
    /// Keyword for stored fields.
    pub field_keyword: FieldKeyword,
    /// Return style in factory bodies.
    pub return_style: ReturnStyle,
    /// Placement of the factories.
    pub factory_placement: FactoryPlacement,
}

impl ConvertOptions {
    /// Default options.
    #[must_use]
    pub const fn new() -> Self {
        ConvertOptions {
            indent_width: 0,
            field_keyword: FieldKeyword::Var,
            return_style: ReturnStyle::Explicit,
            factory_placement: FactoryPlacement::Inline,
        }
    }

    /// Sets the indentation width.
    #[must_use]
    #[ensures(ret.indent_width == indent_width)]
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Sets the stored-field keyword.
    #[must_use]
    #[ensures(ret.field_keyword == field_keyword)]
    pub fn with_field_keyword(mut self, field_keyword: FieldKeyword) -> Self {
        self.field_keyword = field_keyword;
        self
    }

    /// Sets the factory return style.
    #[must_use]
    #[ensures(ret.return_style == return_style)]
    pub fn with_return_style(mut self, return_style: ReturnStyle) -> Self {
        self.return_style = return_style;
        self
    }

    /// Sets where factories are placed.
    #[must_use]
    #[ensures(ret.factory_placement == factory_placement)]
    pub fn with_factory_placement(mut self, factory_placement: FactoryPlacement) -> Self {
        self.factory_placement = factory_placement;
        self
    }

    /// Reads options from JSON. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConvertError::OptionsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
