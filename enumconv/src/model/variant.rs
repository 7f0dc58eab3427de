use enumconv_syntax::Position;
use itertools::Itertools;
use tracing::debug;

use super::{PayloadSlot, Property};
use crate::ConvertError;
use crate::decl::{ConstructorCall, FactoryDecl, FunctionParameter, LabeledArgument};

/// One case of the enum being converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Case name.
    pub name: String,
    /// Payload slots in positional order; empty for a simple case.
    pub payload: Vec<PayloadSlot>,
    /// Location of the case name.
    pub position: Position,
}

impl Variant {
    /// Whether the case carries no payload.
    pub fn is_simple(&self) -> bool {
        self.payload.is_empty()
    }

    /// Lowers this case into a factory on the record `union_name`, with one
    /// constructor argument per property.
    pub fn emit(
        &self,
        union_name: &str,
        properties: &[Property<'_>],
    ) -> Result<FactoryDecl, ConvertError> {
        let arguments = properties
            .iter()
            .map(|property| {
                Ok(LabeledArgument {
                    label: property.name.clone(),
                    value: property.expression_for_case(&self.name, &self.payload)?,
                })
            })
            .collect::<Result<Vec<_>, ConvertError>>()?;
        let body = ConstructorCall { arguments };

        if self.is_simple() {
            debug!(variant = %self.name, position = %self.position, "emitting static property");
            return Ok(FactoryDecl::StaticProperty {
                name: self.name.clone(),
                ty: union_name.to_string(),
                body,
            });
        }

        let parameters = self
            .payload
            .iter()
            .enumerate()
            .map(|(index, slot)| FunctionParameter {
                name: slot.parameter_name(index),
                ty: slot.ty.clone(),
            })
            .collect_vec();
        debug!(
            variant = %self.name,
            position = %self.position,
            parameters = %parameters.iter().map(|p| &p.name).join(", "),
            "emitting static function"
        );
        Ok(FactoryDecl::StaticFunction {
            name: self.name.clone(),
            parameters,
            return_type: union_name.to_string(),
            body,
        })
    }
}
