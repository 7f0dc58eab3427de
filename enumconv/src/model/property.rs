use std::collections::HashSet;

use enumconv_syntax::{
    CaseItem, EnumCasePattern, Expression, Node, Pattern, Position, SwitchCase, SwitchCaseLabel,
    SwitchStmt, find_descendant,
};
use tracing::{trace, warn};

use super::{PayloadSlot, Variant};
use crate::ConvertError;
use crate::rewrite::IdentifierRewriter;

/// A computed property whose body switches over `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property<'tree> {
    /// Property name, reused as the record field name.
    pub name: String,
    /// Declared type.
    pub ty: String,
    /// The `switch self` statement, borrowed from the parsed tree.
    pub body: &'tree SwitchStmt,
    /// Location of the `var` keyword.
    pub position: Position,
}

fn enum_case_patterns(arm: &SwitchCase) -> impl Iterator<Item = &EnumCasePattern> {
    let items: &[CaseItem] = match &arm.label {
        SwitchCaseLabel::Case(items) => items,
        SwitchCaseLabel::Default => &[],
    };
    items.iter().filter_map(|item| match &item.pattern {
        Pattern::EnumCase(pattern) => Some(pattern),
        Pattern::Other(_) => None,
    })
}

impl<'tree> Property<'tree> {
    /// The first arm naming `variant_name`, with the pattern that names it.
    fn arm_for(&self, variant_name: &str) -> Option<(&'tree SwitchCase, &'tree EnumCasePattern)> {
        self.body.cases.iter().find_map(|arm| {
            enum_case_patterns(arm)
                .find(|pattern| pattern.case_name() == variant_name)
                .map(|pattern| (arm, pattern))
        })
    }

    /// Checks that every arm names a declared case, at most once.
    pub fn validate(&self, variants: &[Variant]) -> Result<(), ConvertError> {
        let mut seen = HashSet::new();
        for arm in &self.body.cases {
            for pattern in enum_case_patterns(arm) {
                let case = pattern.case_name();
                if !variants.iter().any(|v| v.name == case) {
                    return Err(ConvertError::UnknownVariant {
                        property: self.name.clone(),
                        variant: case.to_string(),
                        position: arm.position,
                    });
                }
                if !seen.insert(case) {
                    return Err(ConvertError::DuplicateArm {
                        property: self.name.clone(),
                        variant: case.to_string(),
                        position: arm.position,
                    });
                }
            }
        }
        Ok(())
    }

    /// The expression this property's arm for `variant_name` returns, with
    /// names bound by the arm's pattern renamed to the factory parameter
    /// names of `slots`.
    ///
    /// Bindings pair with slots by position. Renames apply one slot at a time
    /// in positional order, each on the result of the previous one, so a
    /// target name the expression already references is merged with it.
    pub fn expression_for_case(
        &self,
        variant_name: &str,
        slots: &[PayloadSlot],
    ) -> Result<Expression, ConvertError> {
        let (arm, pattern) =
            self.arm_for(variant_name)
                .ok_or_else(|| ConvertError::NonExhaustiveMatch {
                    property: self.name.clone(),
                    variant: variant_name.to_string(),
                    position: self.position,
                })?;

        let mut expression = find_descendant(Node::from(arm), Node::as_return_stmt)
            .and_then(|ret| ret.expression.clone())
            .ok_or_else(|| ConvertError::NoReturnExpression {
                property: self.name.clone(),
                variant: variant_name.to_string(),
                position: arm.position,
            })?;

        let Some(tuple) = &pattern.payload else {
            return Ok(expression);
        };

        for (index, (slot, element)) in slots.iter().zip(&tuple.elements).enumerate() {
            let Some(binding) = &element.binding else {
                continue;
            };
            let parameter = slot.parameter_name(index);
            if binding.name == parameter {
                continue;
            }
            if expression.references().contains(&parameter.as_str()) {
                warn!(
                    property = %self.name,
                    variant = variant_name,
                    from = %binding.name,
                    to = %parameter,
                    "rename target is already referenced in this arm"
                );
            }
            trace!(from = %binding.name, to = %parameter, "renaming binding");
            expression = IdentifierRewriter::new(&binding.name, &parameter).rewrite(&expression);
        }
        Ok(expression)
    }
}
