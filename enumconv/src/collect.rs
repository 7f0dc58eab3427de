//! Builds a [`Union`] from a parsed source file.

use enumconv_syntax::{
    EnumCaseElement, Member, Node, SourceFile, VariableDecl, descendants, find_descendant,
};
use tracing::{debug, trace, warn};

use crate::ConvertError;
use crate::model::{PayloadSlot, Property, Union, Variant};

/// Collects the first enum declaration of `file`: one [`Variant`] per case
/// and one [`Property`] per instance property that switches over `self`.
///
/// Further enum declarations are ignored with a warning. Properties reference
/// the parsed tree, so the result borrows `file`.
pub fn collect(file: &SourceFile) -> Result<Union<'_>, ConvertError> {
    let mut declarations = file.declarations.iter();
    let decl = declarations
        .next()
        .ok_or(ConvertError::NoUnionDeclaration)?;
    for extra in declarations {
        warn!(name = %extra.name, position = %extra.position, "ignoring additional enum declaration");
    }

    let mut union = Union::new(decl.name.clone());
    for member in &decl.members {
        match member {
            Member::Case(case) => {
                for element in &case.elements {
                    collect_variant(&mut union, element)?;
                }
            }
            Member::Variable(var) => collect_property(&mut union, var)?,
        }
    }
    Ok(union)
}

fn collect_variant(union: &mut Union<'_>, element: &EnumCaseElement) -> Result<(), ConvertError> {
    trace!(case = %element.name, "visiting case");
    let parameters = element
        .associated_value
        .iter()
        .flat_map(|clause| &clause.parameters);

    let mut payload = Vec::new();
    for parameter in parameters {
        if let Some(second) = &parameter.second_name {
            return Err(ConvertError::UnsupportedGrammar {
                variant: element.name.clone(),
                reason: format!(
                    "payload label '{}' has a second name '{second}'",
                    parameter.first_name.as_deref().unwrap_or_default()
                ),
                position: parameter.position,
            });
        }
        let Some(ty) = &parameter.ty else {
            return Err(ConvertError::UnsupportedGrammar {
                variant: element.name.clone(),
                reason: "payload entry has no type".to_string(),
                position: parameter.position,
            });
        };
        payload.push(PayloadSlot::new(parameter.first_name.clone(), ty.clone()));
    }

    union.variants.push(Variant {
        name: element.name.clone(),
        payload,
        position: element.position,
    });
    Ok(())
}

fn collect_property<'a>(union: &mut Union<'a>, var: &'a VariableDecl) -> Result<(), ConvertError> {
    let name = &var.binding.name;
    trace!(property = %name, "visiting property");
    if var.is_type_member() {
        debug!(property = %name, "skipping type property");
        return Ok(());
    }

    let mut switches = descendants(Node::from(var))
        .into_iter()
        .filter_map(|node| node.as_switch_stmt().filter(|switch| switch.subject.is_self()));
    let Some(switch) = switches.next() else {
        debug!(property = %name, "skipping property without `switch self`");
        return Ok(());
    };
    if switches.next().is_some() {
        warn!(property = %name, position = %var.position, "using the first of several `switch self` statements");
    }
    let returns = switch
        .cases
        .iter()
        .any(|arm| find_descendant(Node::from(arm), Node::as_return_stmt).is_some());
    if !returns {
        debug!(property = %name, "skipping property whose switch never returns");
        return Ok(());
    }

    let ty = var
        .binding
        .type_annotation
        .as_ref()
        .ok_or_else(|| ConvertError::MissingTypeAnnotation {
            property: name.clone(),
            position: var.position,
        })?;

    union.properties.push(Property {
        name: name.clone(),
        ty: ty.ty.clone(),
        body: switch,
        position: var.position,
    });
    Ok(())
}
