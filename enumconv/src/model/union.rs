use tracing::debug;

use super::{Property, Variant};
use crate::ConvertError;
use crate::decl::{FieldDecl, RecordDecl};

/// The enum being converted: its cases and its switch-based properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Union<'tree> {
    /// Type name.
    pub name: String,
    /// Cases in declaration order.
    pub variants: Vec<Variant>,
    /// Properties in declaration order.
    pub properties: Vec<Property<'tree>>,
}

impl<'tree> Union<'tree> {
    /// An empty union named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Union {
            name: name.into(),
            variants: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Lowers the union into a record with one stored field per property and
    /// one factory per case.
    pub fn emit(&self) -> Result<RecordDecl, ConvertError> {
        for property in &self.properties {
            property.validate(&self.variants)?;
        }

        let fields = self
            .properties
            .iter()
            .map(|property| FieldDecl {
                name: property.name.clone(),
                ty: property.ty.clone(),
            })
            .collect();

        let factories = self
            .variants
            .iter()
            .map(|variant| variant.emit(&self.name, &self.properties))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(name = %self.name, "lowered union into record");
        Ok(RecordDecl {
            name: self.name.clone(),
            fields,
            factories,
        })
    }
}
