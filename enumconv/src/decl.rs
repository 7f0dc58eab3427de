//! The declaration tree produced by lowering a [`crate::model::Union`].
//!
//! These nodes describe the output record independently of layout. Rendering
//! them to text is [`crate::codegen`]'s job.

use enumconv_syntax::Expression;

/// `struct Name { fields; factories }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    /// Record type name, taken from the enum.
    pub name: String,
    /// Stored fields in property declaration order.
    pub fields: Vec<FieldDecl>,
    /// One factory per case, in case declaration order.
    pub factories: Vec<FactoryDecl>,
}

/// A stored field without initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Field type as written in the source.
    pub ty: String,
}

/// A static member building one record value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryDecl {
    /// `static var name: Type { … }` for a case without payload.
    StaticProperty {
        /// Case name.
        name: String,
        /// Record type name.
        ty: String,
        /// The constructor call the body returns.
        body: ConstructorCall,
    },
    /// `static func name(params) -> Type { … }` for a case with payload.
    StaticFunction {
        /// Case name.
        name: String,
        /// One parameter per payload slot.
        parameters: Vec<FunctionParameter>,
        /// Record type name.
        return_type: String,
        /// The constructor call the body returns.
        body: ConstructorCall,
    },
}

impl FactoryDecl {
    /// Name of the generated member.
    pub fn name(&self) -> &str {
        match self {
            FactoryDecl::StaticProperty { name, .. } | FactoryDecl::StaticFunction { name, .. } => name,
        }
    }

    /// The constructor call the member returns.
    pub const fn body(&self) -> &ConstructorCall {
        match self {
            FactoryDecl::StaticProperty { body, .. } | FactoryDecl::StaticFunction { body, .. } => body,
        }
    }
}

/// `name: Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParameter {
    /// Parameter name, also used as its argument label.
    pub name: String,
    /// Parameter type.
    pub ty: String,
}

/// `.init(label: value, …)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructorCall {
    /// Arguments in field order.
    pub arguments: Vec<LabeledArgument>,
}

/// `label: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledArgument {
    /// Field the argument initializes.
    pub label: String,
    /// Initializer expression.
    pub value: Expression,
}
