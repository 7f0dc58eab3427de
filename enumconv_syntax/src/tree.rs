//! The syntax tree produced by [`crate::parse_source`].
//!
//! The node set is closed: every node struct is reachable through one
//! [`Node`] variant, and [`Node::children`] lists a node's children in
//! declaration order. Queries over the tree are written against [`Node`]
//! (see [`crate::query`]).

use crate::expr::Expression;
use crate::source_map::Position;

/// A parsed source file. Only `enum` declarations are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Top-level enum declarations in source order.
    pub declarations: Vec<EnumDecl>,
}

/// `enum Name { … }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Declared type name.
    pub name: String,
    /// Case and property declarations in source order.
    pub members: Vec<Member>,
    /// Location of the `enum` keyword.
    pub position: Position,
}

/// A member of an enum body that the parser keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// A `case` line.
    Case(EnumCaseDecl),
    /// A `var` declaration.
    Variable(VariableDecl),
}

/// `case a, b(Int), c = 3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseDecl {
    /// Comma-separated elements of the line.
    pub elements: Vec<EnumCaseElement>,
}

/// One case of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseElement {
    /// Case name.
    pub name: String,
    /// Payload list, if the case has one.
    pub associated_value: Option<ParameterClause>,
    /// Location of the case name.
    pub position: Position,
}

/// Parenthesized payload list of a case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterClause {
    /// Entries in positional order.
    pub parameters: Vec<Parameter>,
}

/// One payload entry: `Type`, `label: Type` or `outer inner: Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// First label, if any.
    pub first_name: Option<String>,
    /// Second (internal) label, if any.
    pub second_name: Option<String>,
    /// Source text of the type, without any default value. `None` when the
    /// entry has a label but nothing after the colon.
    pub ty: Option<String>,
    /// Location of the first token of the entry.
    pub position: Position,
}

/// `[modifiers] var name[: Type] [{ … }]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    /// Declaration modifiers such as `static`, `public`, `private(set)`.
    pub modifiers: Vec<String>,
    /// The single binding the declaration introduces.
    pub binding: PatternBinding,
    /// Location of the `var` keyword.
    pub position: Position,
}

impl VariableDecl {
    /// Whether the declaration carries `static` or `class`.
    pub fn is_type_member(&self) -> bool {
        self.modifiers
            .iter()
            .any(|m| m == "static" || m == "class")
    }
}

/// Name, type and body of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBinding {
    /// Variable name.
    pub name: String,
    /// `: Type`, if written.
    pub type_annotation: Option<TypeAnnotation>,
    /// Computed body, from either `{ … }` or `{ get { … } }`.
    pub accessor: Option<CodeBlock>,
}

/// `: Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    /// Source text of the type.
    pub ty: String,
}

/// A braced statement list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// Statements in source order.
    pub statements: Vec<Stmt>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `switch subject { … }`
    Switch(SwitchStmt),
    /// `return [expr]`
    Return(ReturnStmt),
    /// Any other statement. Braced blocks inside it are still parsed.
    Other(OtherStmt),
}

/// `switch subject { case …: … }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    /// The value being matched.
    pub subject: Expression,
    /// Arms in source order.
    pub cases: Vec<SwitchCase>,
    /// Location of the `switch` keyword.
    pub position: Position,
}

/// One arm of a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCase {
    /// What the arm matches.
    pub label: SwitchCaseLabel,
    /// Arm body.
    pub statements: Vec<Stmt>,
    /// Location of the `case` or `default` keyword.
    pub position: Position,
}

/// The label of a switch arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchCaseLabel {
    /// `case p1, p2:`
    Case(Vec<CaseItem>),
    /// `default:` or `@unknown default:`
    Default,
}

/// One comma-separated pattern of a `case` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseItem {
    /// The pattern.
    pub pattern: Pattern,
}

/// A case pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `.name`, `Type.name`, `.name(…)`
    EnumCase(EnumCasePattern),
    /// A pattern shape that is not an enum case, kept as text.
    Other(String),
}

/// A pattern naming an enum case, with optional payload destructuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCasePattern {
    /// Dotted path, e.g. `["Account", "pro"]` or `["pro"]` for `.pro`.
    pub path: Vec<String>,
    /// `(…)` after the case name.
    pub payload: Option<TuplePattern>,
}

impl EnumCasePattern {
    /// The trailing path component: the case being matched.
    pub fn case_name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }
}

/// `(a, let b, label: let c, _)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuplePattern {
    /// Elements in positional order.
    pub elements: Vec<TuplePatternElement>,
}

/// One positional element of a tuple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuplePatternElement {
    /// `label:` prefix, if written.
    pub label: Option<String>,
    /// The name bound at this position; `None` for `_` or a non-binding
    /// sub-pattern.
    pub binding: Option<IdentifierPattern>,
}

/// A name introduced by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPattern {
    /// The bound name.
    pub name: String,
}

/// `return [expression]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    /// Returned value; `None` for a bare `return`.
    pub expression: Option<Expression>,
    /// Location of the `return` keyword.
    pub position: Position,
}

/// A statement the converter does not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherStmt {
    /// Source text of the statement.
    pub text: String,
    /// Braced blocks appearing in the statement, in source order.
    pub blocks: Vec<CodeBlock>,
    /// Location of the first token.
    pub position: Position,
}

macro_rules! nodes {
    ($($variant:ident => $accessor:ident),* $(,)?) => {
        /// Syntactic kind of a [`Node`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        /// A borrowed reference to any node of the tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Node<'a> {
            $(
                #[allow(missing_docs)]
                $variant(&'a $variant),
            )*
        }

        impl<'a> Node<'a> {
            /// Syntactic kind of this node.
            pub const fn kind(self) -> NodeKind {
                match self {
                    $(Node::$variant(_) => NodeKind::$variant,)*
                }
            }

            $(
                #[allow(missing_docs)]
                pub const fn $accessor(self) -> Option<&'a $variant> {
                    match self {
                        Node::$variant(node) => Some(node),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl<'a> From<&'a $variant> for Node<'a> {
                fn from(node: &'a $variant) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

nodes! {
    SourceFile => as_source_file,
    EnumDecl => as_enum_decl,
    EnumCaseDecl => as_enum_case_decl,
    EnumCaseElement => as_enum_case_element,
    ParameterClause => as_parameter_clause,
    Parameter => as_parameter,
    VariableDecl => as_variable_decl,
    PatternBinding => as_pattern_binding,
    TypeAnnotation => as_type_annotation,
    CodeBlock => as_code_block,
    SwitchStmt => as_switch_stmt,
    SwitchCase => as_switch_case,
    CaseItem => as_case_item,
    EnumCasePattern => as_enum_case_pattern,
    TuplePattern => as_tuple_pattern,
    TuplePatternElement => as_tuple_pattern_element,
    IdentifierPattern => as_identifier_pattern,
    ReturnStmt => as_return_stmt,
    OtherStmt => as_other_stmt,
}

fn statement_node(stmt: &Stmt) -> Node<'_> {
    match stmt {
        Stmt::Switch(s) => Node::SwitchStmt(s),
        Stmt::Return(r) => Node::ReturnStmt(r),
        Stmt::Other(o) => Node::OtherStmt(o),
    }
}

impl<'a> Node<'a> {
    /// Direct children in declaration order.
    pub fn children(self) -> Vec<Node<'a>> {
        match self {
            Node::SourceFile(file) => file.declarations.iter().map(Node::from).collect(),
            Node::EnumDecl(decl) => decl
                .members
                .iter()
                .map(|member| match member {
                    Member::Case(case) => Node::EnumCaseDecl(case),
                    Member::Variable(var) => Node::VariableDecl(var),
                })
                .collect(),
            Node::EnumCaseDecl(decl) => decl.elements.iter().map(Node::from).collect(),
            Node::EnumCaseElement(element) => {
                element.associated_value.iter().map(Node::from).collect()
            }
            Node::ParameterClause(clause) => clause.parameters.iter().map(Node::from).collect(),
            Node::VariableDecl(decl) => vec![Node::PatternBinding(&decl.binding)],
            Node::PatternBinding(binding) => binding
                .type_annotation
                .iter()
                .map(Node::from)
                .chain(binding.accessor.iter().map(Node::from))
                .collect(),
            Node::CodeBlock(block) => block.statements.iter().map(statement_node).collect(),
            Node::SwitchStmt(switch) => switch.cases.iter().map(Node::from).collect(),
            Node::SwitchCase(case) => {
                let items: &[CaseItem] = match &case.label {
                    SwitchCaseLabel::Case(items) => items,
                    SwitchCaseLabel::Default => &[],
                };
                items
                    .iter()
                    .map(Node::from)
                    .chain(case.statements.iter().map(statement_node))
                    .collect()
            }
            Node::CaseItem(item) => match &item.pattern {
                Pattern::EnumCase(pattern) => vec![Node::EnumCasePattern(pattern)],
                Pattern::Other(_) => Vec::new(),
            },
            Node::EnumCasePattern(pattern) => pattern.payload.iter().map(Node::from).collect(),
            Node::TuplePattern(tuple) => tuple.elements.iter().map(Node::from).collect(),
            Node::TuplePatternElement(element) => element.binding.iter().map(Node::from).collect(),
            Node::OtherStmt(other) => other.blocks.iter().map(Node::from).collect(),
            Node::Parameter(_)
            | Node::TypeAnnotation(_)
            | Node::IdentifierPattern(_)
            | Node::ReturnStmt(_) => Vec::new(),
        }
    }
}
