//! Renders a [`RecordDecl`] as Swift source.

use std::fmt;

use itertools::Itertools;

use crate::config::{ConvertOptions, FactoryPlacement, ReturnStyle};
use crate::decl::{ConstructorCall, FactoryDecl, RecordDecl};

/// Displays a record declaration laid out according to [`ConvertOptions`].
#[derive(Debug, Clone, Copy)]
pub struct RecordRenderer<'r> {
    record: &'r RecordDecl,
    options: &'r ConvertOptions,
}

impl<'r> RecordRenderer<'r> {
    /// A renderer for `record`.
    pub const fn new(record: &'r RecordDecl, options: &'r ConvertOptions) -> Self {
        RecordRenderer { record, options }
    }

    fn line(&self, f: &mut fmt::Formatter<'_>, depth: usize, text: &str) -> fmt::Result {
        let indent = self.options.indent_width * depth;
        writeln!(f, "{:indent$}{text}", "")
    }

    fn constructor(&self, call: &ConstructorCall) -> String {
        let arguments = call
            .arguments
            .iter()
            .map(|argument| format!("{}: {}", argument.label, argument.value))
            .join(", ");
        match self.options.return_style {
            ReturnStyle::Explicit => format!("return .init({arguments})"),
            ReturnStyle::Implicit => format!(".init({arguments})"),
        }
    }

    fn factory(&self, f: &mut fmt::Formatter<'_>, depth: usize, factory: &FactoryDecl) -> fmt::Result {
        let header = match factory {
            FactoryDecl::StaticProperty { name, ty, .. } => format!("static var {name}: {ty} {{"),
            FactoryDecl::StaticFunction {
                name,
                parameters,
                return_type,
                ..
            } => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| format!("{}: {}", parameter.name, parameter.ty))
                    .join(", ");
                format!("static func {name}({parameters}) -> {return_type} {{")
            }
        };
        self.line(f, depth, &header)?;
        self.line(f, depth + 1, &self.constructor(factory.body()))?;
        self.line(f, depth, "}")
    }

    fn fields(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.options.field_keyword.as_str();
        for field in &self.record.fields {
            self.line(f, 1, &format!("{keyword} {}: {}", field.name, field.ty))?;
        }
        Ok(())
    }
}

impl fmt::Display for RecordRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.record.name;
        let factories = &self.record.factories;

        self.line(f, 0, &format!("struct {name} {{"))?;
        self.fields(f)?;
        match self.options.factory_placement {
            FactoryPlacement::Inline => {
                if !factories.is_empty() {
                    writeln!(f)?;
                }
                for factory in factories {
                    self.factory(f, 1, factory)?;
                }
                self.line(f, 0, "}")
            }
            FactoryPlacement::Extension => {
                self.line(f, 0, "}")?;
                if factories.is_empty() {
                    return Ok(());
                }
                writeln!(f)?;
                self.line(f, 0, &format!("extension {name} {{"))?;
                for factory in factories {
                    self.factory(f, 1, factory)?;
                }
                self.line(f, 0, "}")
            }
        }
    }
}

/// Renders `record` to source text ending in a newline.
pub fn render(record: &RecordDecl, options: &ConvertOptions) -> String {
    RecordRenderer::new(record, options).to_string()
}

#[cfg(test)]
mod tests {
    use enumconv_syntax::{Expression, Leaf, Expr};

    use super::*;
    use crate::config::FieldKeyword;
    use crate::decl::{FieldDecl, FunctionParameter, LabeledArgument};

    fn literal(text: &str) -> Expression {
        Expression {
            items: vec![Expr::Literal(Leaf::new(text))],
        }
    }

    fn record() -> RecordDecl {
        RecordDecl {
            name: "Badge".into(),
            fields: vec![FieldDecl {
                name: "title".into(),
                ty: "String".into(),
            }],
            factories: vec![
                FactoryDecl::StaticProperty {
                    name: "gold".into(),
                    ty: "Badge".into(),
                    body: ConstructorCall {
                        arguments: vec![LabeledArgument {
                            label: "title".into(),
                            value: literal(r#""Gold""#),
                        }],
                    },
                },
                FactoryDecl::StaticFunction {
                    name: "custom".into(),
                    parameters: vec![FunctionParameter {
                        name: "title".into(),
                        ty: "String".into(),
                    }],
                    return_type: "Badge".into(),
                    body: ConstructorCall {
                        arguments: vec![LabeledArgument {
                            label: "title".into(),
                            value: Expression {
                                items: vec![Expr::Reference(Leaf::new("title"))],
                            },
                        }],
                    },
                },
            ],
        }
    }

    #[test]
    fn default_layout() {
        let expected = "struct Badge {\nvar title: String\n\nstatic var gold: Badge {\nreturn .init(title: \"Gold\")\n}\nstatic func custom(title: String) -> Badge {\nreturn .init(title: title)\n}\n}\n";
        assert_eq!(render(&record(), &ConvertOptions::default()), expected);
    }

    #[test]
    fn extension_layout_with_indent() {
        let options = ConvertOptions::new()
            .with_indent_width(4)
            .with_field_keyword(FieldKeyword::Let)
            .with_return_style(ReturnStyle::Implicit)
            .with_factory_placement(FactoryPlacement::Extension);
        let expected = r#"struct Badge {
    let title: String
}

extension Badge {
    static var gold: Badge {
        .init(title: "Gold")
    }
    static func custom(title: String) -> Badge {
        .init(title: title)
    }
}
"#;
        assert_eq!(render(&record(), &options), expected);
    }

    #[test]
    fn no_factories_no_blank_line() {
        let mut record = record();
        record.factories.clear();
        assert_eq!(
            render(&record, &ConvertOptions::default()),
            "struct Badge {\nvar title: String\n}\n"
        );
        let options = ConvertOptions::new().with_factory_placement(FactoryPlacement::Extension);
        assert_eq!(render(&record, &options), "struct Badge {\nvar title: String\n}\n");
    }
}
