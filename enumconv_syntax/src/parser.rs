//! Recursive-descent parser over the token trees of a Swift source file.
//!
//! Tokens come from `proc-macro2` with span locations enabled, lexing the
//! masked text of [`crate::mask`]; structure is read with `syn`'s
//! `ParseStream` machinery. Names and other spellings are sliced from the
//! original source. Constructs outside the handled subset are skipped one
//! token tree at a time.

use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};
use syn::ext::IdentExt;
use syn::parse::{ParseStream, Parser};
use syn::token::{Brace, Paren};
use syn::{Ident, Token, braced, parenthesized};
use tracing::trace;

use crate::expr::Expression;
use crate::source_map::{Position, SourceMap};
use crate::tree::{
    CaseItem, CodeBlock, EnumCaseDecl, EnumCaseElement, EnumCasePattern, EnumDecl,
    IdentifierPattern, Member, OtherStmt, Parameter, ParameterClause, Pattern, PatternBinding,
    ReturnStmt, SourceFile, Stmt, SwitchCase, SwitchCaseLabel, SwitchStmt, TuplePattern,
    TuplePatternElement, TypeAnnotation, VariableDecl,
};

/// Keywords that may precede `var` in a member declaration.
const MODIFIERS: &[&str] = &[
    "static",
    "class",
    "public",
    "internal",
    "fileprivate",
    "private",
    "open",
    "final",
    "override",
    "lazy",
    "nonisolated",
];

/// Keywords that always begin a new statement.
const STATEMENT_KEYWORDS: &[&str] = &[
    "return",
    "switch",
    "throw",
    "break",
    "continue",
    "fallthrough",
    "defer",
    "guard",
    "for",
    "while",
    "repeat",
    "do",
];

/// Keywords after which `let`, `var` and `case` continue a condition.
const CONDITION_KEYWORDS: &[&str] = &["if", "guard", "while", "case", "for"];

const ACCESSOR_KEYWORDS: &[&str] = &["get", "set", "willSet", "didSet", "mutating", "nonmutating"];

pub(crate) fn parse_tokens(tokens: TokenStream, map: &SourceMap<'_>) -> syn::Result<SourceFile> {
    (|input: ParseStream<'_>| parse_source_file(input, map)).parse2(tokens)
}

fn peek_keyword(input: ParseStream<'_>, word: &str) -> bool {
    input.cursor().ident().is_some_and(|(ident, _)| ident == word)
}

fn peek_any_keyword(input: ParseStream<'_>, words: &[&str]) -> bool {
    input
        .cursor()
        .ident()
        .is_some_and(|(ident, _)| words.iter().any(|word| ident == word))
}

fn parse_keyword(input: ParseStream<'_>, word: &str) -> syn::Result<Position> {
    input.step(|cursor| match cursor.ident() {
        Some((ident, rest)) if ident == word => Ok((Position::of(ident.span()), rest)),
        _ => Err(cursor.error(format!("expected `{word}`"))),
    })
}

fn is_ident(token: Option<&TokenTree>, words: &[&str]) -> bool {
    matches!(token, Some(TokenTree::Ident(ident)) if words.iter().any(|word| ident == word))
}

fn is_punct(token: Option<&TokenTree>, c: char) -> bool {
    matches!(token, Some(TokenTree::Punct(p)) if p.as_char() == c)
}

/// Consumes token trees onto `tokens` until `stop` holds or the input ends.
/// `stop` sees the stream positioned at the next token and the last token taken.
fn take_until(
    input: ParseStream<'_>,
    mut tokens: Vec<TokenTree>,
    mut stop: impl FnMut(ParseStream<'_>, Option<&TokenTree>) -> bool,
) -> syn::Result<Vec<TokenTree>> {
    while !input.is_empty() && !stop(input, tokens.last()) {
        tokens.push(input.parse()?);
    }
    Ok(tokens)
}

/// Splits `tokens` on commas that are not inside `<…>`.
fn split_top_level_commas(tokens: Vec<TokenTree>) -> Vec<Vec<TokenTree>> {
    let mut parts = vec![Vec::new()];
    let mut depth = 0usize;
    let mut prev_minus = false;
    for token in tokens {
        if let TokenTree::Punct(p) = &token {
            match p.as_char() {
                '<' => depth += 1,
                '>' if !prev_minus => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(Vec::new());
                    prev_minus = false;
                    continue;
                }
                _ => {}
            }
            prev_minus = p.as_char() == '-' && p.spacing() == Spacing::Joint;
        } else {
            prev_minus = false;
        }
        if let Some(part) = parts.last_mut() {
            part.push(token);
        }
    }
    parts.retain(|part| !part.is_empty());
    parts
}

fn parse_source_file(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<SourceFile> {
    let mut declarations = Vec::new();
    while !input.is_empty() {
        if peek_keyword(input, "enum") {
            declarations.push(parse_enum(input, map)?);
        } else {
            input.parse::<TokenTree>()?;
        }
    }
    Ok(SourceFile { declarations })
}

fn parse_enum(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<EnumDecl> {
    let position = parse_keyword(input, "enum")?;
    let name = map.spelling(&Ident::parse_any(input)?);
    trace!(%name, %position, "enum declaration");

    // Generic parameters, raw type and conformances.
    while !input.peek(Brace) {
        if input.is_empty() {
            return Err(input.error(format!("expected body of enum `{name}`")));
        }
        input.parse::<TokenTree>()?;
    }

    let body;
    braced!(body in input);
    let members = parse_members(&body, map)?;
    Ok(EnumDecl {
        name,
        members,
        position,
    })
}

fn parse_members(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<Vec<Member>> {
    let mut members = Vec::new();
    let mut modifiers: Vec<String> = Vec::new();
    while !input.is_empty() {
        if peek_keyword(input, "case") {
            members.push(Member::Case(parse_case_decl(input, map)?));
            modifiers.clear();
        } else if peek_keyword(input, "var") {
            let modifiers = std::mem::take(&mut modifiers);
            members.push(Member::Variable(parse_variable(input, map, modifiers)?));
        } else if peek_any_keyword(input, MODIFIERS) {
            let mut modifier = Ident::parse_any(input)?.to_string();
            // `private(set)`
            if input.peek(Paren) {
                let group: TokenTree = input.parse()?;
                modifier.push_str(&map.text_of(&[group]));
            }
            modifiers.push(modifier);
        } else {
            input.parse::<TokenTree>()?;
            modifiers.clear();
        }
    }
    Ok(members)
}

fn parse_case_decl(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<EnumCaseDecl> {
    parse_keyword(input, "case")?;
    let mut elements = Vec::new();
    loop {
        let ident = Ident::parse_any(input)?;
        let position = Position::of(ident.span());
        let associated_value = if input.peek(Paren) {
            let content;
            parenthesized!(content in input);
            Some(parse_parameter_clause(&content, map)?)
        } else {
            None
        };

        // Raw value.
        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            if input.peek(Token![-]) {
                input.parse::<Token![-]>()?;
            }
            input.parse::<TokenTree>()?;
        }

        elements.push(EnumCaseElement {
            name: map.spelling(&ident),
            associated_value,
            position,
        });

        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        } else {
            break;
        }
    }
    Ok(EnumCaseDecl { elements })
}

fn parse_parameter_clause(
    input: ParseStream<'_>,
    map: &SourceMap<'_>,
) -> syn::Result<ParameterClause> {
    let tokens: Vec<TokenTree> = input.parse::<TokenStream>()?.into_iter().collect();
    let parameters = split_top_level_commas(tokens)
        .into_iter()
        .map(|entry| parse_parameter(&entry, map))
        .collect::<syn::Result<_>>()?;
    Ok(ParameterClause { parameters })
}

fn parse_parameter(entry: &[TokenTree], map: &SourceMap<'_>) -> syn::Result<Parameter> {
    let position = entry
        .first()
        .map_or_else(Position::default, |token| Position::of(token.span()));

    let colon = entry.iter().position(|token| is_punct(Some(token), ':'));
    let (labels, ty_tokens) = match colon {
        Some(index) => (&entry[..index], &entry[index + 1..]),
        None => (&entry[..0], entry),
    };

    let mut names = Vec::with_capacity(2);
    for label in labels {
        match label {
            TokenTree::Ident(ident) if names.len() < 2 => names.push(map.spelling(ident)),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "expected at most two labels before `:`",
                ));
            }
        }
    }
    if colon.is_some() && names.is_empty() {
        return Err(syn::Error::new(
            entry[0].span(),
            "expected a label before `:`",
        ));
    }
    let mut names = names.into_iter();

    // A default value: `count: Int = 0`.
    let ty_end = ty_tokens
        .iter()
        .position(|token| is_punct(Some(token), '='))
        .unwrap_or(ty_tokens.len());
    let ty = map.text_of(&ty_tokens[..ty_end]);

    Ok(Parameter {
        first_name: names.next(),
        second_name: names.next(),
        ty: (!ty.is_empty()).then_some(ty),
        position,
    })
}

fn at_member_start(input: ParseStream<'_>) -> bool {
    peek_any_keyword(input, &["case", "var", "let", "func", "init", "subscript"])
        || peek_any_keyword(input, MODIFIERS)
        || input.peek(Token![@])
        || input.peek(Token![#])
}

fn parse_variable(
    input: ParseStream<'_>,
    map: &SourceMap<'_>,
    modifiers: Vec<String>,
) -> syn::Result<VariableDecl> {
    let position = parse_keyword(input, "var")?;
    let name = map.spelling(&Ident::parse_any(input)?);
    trace!(%name, %position, "variable declaration");

    let type_annotation = if input.peek(Token![:]) {
        input.parse::<Token![:]>()?;
        let tokens = take_until(input, Vec::new(), |s, _| {
            s.peek(Brace) || s.peek(Token![=]) || at_member_start(s)
        })?;
        Some(TypeAnnotation {
            ty: map.text_of(&tokens),
        })
    } else {
        None
    };

    // Initializer expression.
    if input.peek(Token![=]) {
        input.parse::<Token![=]>()?;
        take_until(input, Vec::new(), |s, _| at_member_start(s))?;
    }

    let accessor = if input.peek(Brace) {
        let body;
        braced!(body in input);
        parse_accessor(&body, map)?
    } else {
        None
    };

    Ok(VariableDecl {
        modifiers,
        binding: PatternBinding {
            name,
            type_annotation,
            accessor,
        },
        position,
    })
}

/// Reads a property body: either a plain statement list, or an accessor list
/// of which only the getter is kept.
fn parse_accessor(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<Option<CodeBlock>> {
    let is_accessor_list = peek_any_keyword(input, ACCESSOR_KEYWORDS)
        && (input.peek2(Brace) || input.peek2(Ident::peek_any));
    if !is_accessor_list {
        return Ok(Some(parse_block(input, map)?));
    }

    let mut getter = None;
    while !input.is_empty() {
        let words = take_until(input, Vec::new(), |s, _| s.peek(Brace))?;
        let body;
        braced!(body in input);
        if words.iter().any(|word| is_ident(Some(word), &["get"])) {
            getter = Some(parse_block(&body, map)?);
        }
    }
    Ok(getter)
}

fn parse_block(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<CodeBlock> {
    Ok(CodeBlock {
        statements: parse_statements(input, map, false)?,
    })
}

fn at_arm_start(input: ParseStream<'_>) -> bool {
    peek_keyword(input, "case")
        || (peek_keyword(input, "default") && input.peek2(Token![:]))
        || input.peek(Token![@])
}

fn parse_statements(
    input: ParseStream<'_>,
    map: &SourceMap<'_>,
    in_switch: bool,
) -> syn::Result<Vec<Stmt>> {
    let mut statements = Vec::new();
    while !input.is_empty() && !(in_switch && at_arm_start(input)) {
        if input.peek(Token![;]) {
            input.parse::<Token![;]>()?;
            continue;
        }
        statements.push(parse_statement(input, map, in_switch)?);
    }
    Ok(statements)
}

/// Whether the stream is positioned at the first token of a new statement.
fn at_statement_boundary(input: ParseStream<'_>, prev: Option<&TokenTree>, in_switch: bool) -> bool {
    let continues_condition = is_ident(prev, CONDITION_KEYWORDS) || is_punct(prev, ',');
    input.peek(Token![;])
        || peek_any_keyword(input, STATEMENT_KEYWORDS)
        || (peek_keyword(input, "if") && !is_ident(prev, &["else"]))
        || (peek_any_keyword(input, &["let", "var"]) && !continues_condition)
        || (in_switch && peek_keyword(input, "case") && !continues_condition)
        || (in_switch && peek_keyword(input, "default") && input.peek2(Token![:]))
        || (in_switch && input.peek(Token![@]))
}

fn parse_statement(
    input: ParseStream<'_>,
    map: &SourceMap<'_>,
    in_switch: bool,
) -> syn::Result<Stmt> {
    if peek_keyword(input, "switch") {
        return Ok(Stmt::Switch(parse_switch(input, map)?));
    }

    if peek_keyword(input, "return") {
        let position = parse_keyword(input, "return")?;
        let tokens = take_until(input, Vec::new(), |s, prev| {
            at_statement_boundary(s, prev, in_switch)
        })?;
        let expression = (!tokens.is_empty()).then(|| Expression::from_tokens(&tokens, map));
        return Ok(Stmt::Return(ReturnStmt {
            expression,
            position,
        }));
    }

    let first: TokenTree = input.parse()?;
    let position = Position::of(first.span());
    let tokens = take_until(input, vec![first], |s, prev| {
        at_statement_boundary(s, prev, in_switch)
    })?;
    let blocks = tokens
        .iter()
        .filter_map(|token| match token {
            TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => Some(group.stream()),
            _ => None,
        })
        .map(|stream| (|s: ParseStream<'_>| parse_block(s, map)).parse2(stream))
        .collect::<syn::Result<_>>()?;
    Ok(Stmt::Other(OtherStmt {
        text: map.text_of(&tokens),
        blocks,
        position,
    }))
}

fn parse_switch(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<SwitchStmt> {
    let position = parse_keyword(input, "switch")?;
    let subject = take_until(input, Vec::new(), |s, _| s.peek(Brace))?;
    let subject = Expression::from_tokens(&subject, map);

    let body;
    braced!(body in input);
    let mut cases = Vec::new();
    while !body.is_empty() {
        cases.push(parse_switch_case(&body, map)?);
    }
    Ok(SwitchStmt {
        subject,
        cases,
        position,
    })
}

fn parse_switch_case(input: ParseStream<'_>, map: &SourceMap<'_>) -> syn::Result<SwitchCase> {
    let position = Position::of(input.span());
    if input.peek(Token![@]) {
        input.parse::<Token![@]>()?;
        parse_keyword(input, "unknown")?;
    }

    let label = if peek_keyword(input, "default") {
        parse_keyword(input, "default")?;
        input.parse::<Token![:]>()?;
        SwitchCaseLabel::Default
    } else {
        parse_keyword(input, "case")?;
        let tokens = take_until(input, Vec::new(), |s, _| s.peek(Token![:]))?;
        input.parse::<Token![:]>()?;
        let items = split_top_level_commas(tokens)
            .into_iter()
            .map(|mut item| {
                // Trailing `where` clause.
                if let Some(index) = item.iter().position(|t| is_ident(Some(t), &["where"])) {
                    item.truncate(index);
                }
                CaseItem {
                    pattern: parse_pattern(&item, map),
                }
            })
            .collect();
        SwitchCaseLabel::Case(items)
    };

    let statements = parse_statements(input, map, true)?;
    Ok(SwitchCase {
        label,
        statements,
        position,
    })
}

/// Reads an enum-case pattern out of the tokens of one case item. Shapes that
/// are not an enum case come back as [`Pattern::Other`].
fn parse_pattern(tokens: &[TokenTree], map: &SourceMap<'_>) -> Pattern {
    let other = || Pattern::Other(map.text_of(tokens));

    let (binds_all, mut rest) = match tokens {
        [TokenTree::Ident(word), tail @ ..] if word == "let" || word == "var" => (true, tail),
        _ => (false, tokens),
    };

    let mut path = Vec::new();
    if let [TokenTree::Ident(ident), tail @ ..] = rest {
        path.push(map.spelling(ident));
        rest = tail;
    }
    let mut dots = 0;
    while let [TokenTree::Punct(dot), TokenTree::Ident(ident), tail @ ..] = rest {
        if dot.as_char() != '.' {
            break;
        }
        dots += 1;
        path.push(map.spelling(ident));
        rest = tail;
    }
    if dots == 0 {
        return other();
    }

    let payload = match rest {
        [] => None,
        [TokenTree::Group(group)] if group.delimiter() == Delimiter::Parenthesis => {
            let elements = split_top_level_commas(group.stream().into_iter().collect())
                .iter()
                .map(|element| parse_tuple_element(element, binds_all, map))
                .collect();
            Some(TuplePattern { elements })
        }
        _ => return other(),
    };

    Pattern::EnumCase(EnumCasePattern { path, payload })
}

fn parse_tuple_element(
    tokens: &[TokenTree],
    binds_all: bool,
    map: &SourceMap<'_>,
) -> TuplePatternElement {
    let (label, rest) = match tokens {
        [TokenTree::Ident(label), TokenTree::Punct(colon), tail @ ..] if colon.as_char() == ':' => {
            (Some(map.spelling(label)), tail)
        }
        _ => (None, tokens),
    };

    let name = match rest {
        [TokenTree::Ident(word), TokenTree::Ident(name)] if word == "let" || word == "var" => {
            Some(map.spelling(name))
        }
        [TokenTree::Ident(name)] if binds_all && name != "_" => Some(map.spelling(name)),
        _ => None,
    };

    TuplePatternElement {
        label,
        binding: name.map(|name| IdentifierPattern { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<TokenTree> {
        text.parse::<TokenStream>().expect("lexes").into_iter().collect()
    }

    #[test]
    fn commas_inside_generics_do_not_split() {
        let parts = split_top_level_commas(tokens("Dictionary<String, Int>, (Int) -> Void, Int"));
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn pattern_requires_a_dot() {
        let text = "value";
        let map = SourceMap::new(text);
        assert_eq!(parse_pattern(&tokens(text), &map), Pattern::Other("value".into()));
    }

    #[test]
    fn outer_let_binds_bare_names() {
        let text = "let .normal(_, number)";
        let map = SourceMap::new(text);
        let Pattern::EnumCase(pattern) = parse_pattern(&tokens(text), &map) else {
            panic!("expected an enum case pattern");
        };
        assert_eq!(pattern.case_name(), "normal");
        let payload = pattern.payload.expect("payload");
        assert_eq!(payload.elements[0].binding, None);
        assert_eq!(
            payload.elements[1].binding,
            Some(IdentifierPattern {
                name: "number".into()
            })
        );
    }

    #[test]
    fn escaped_names_keep_their_backticks() {
        let source = "enum E { case `default`(`in`: Int)\n var `is`: Int { switch self { case .`default`(let `for`): return `for` } } }";
        let file = crate::parse_source(source).unwrap();
        let decl = &file.declarations[0];
        let Member::Case(case) = &decl.members[0] else {
            panic!("expected a case line");
        };
        assert_eq!(case.elements[0].name, "`default`");
        let clause = case.elements[0].associated_value.as_ref().unwrap();
        assert_eq!(clause.parameters[0].first_name.as_deref(), Some("`in`"));
        let Member::Variable(var) = &decl.members[1] else {
            panic!("expected a property");
        };
        assert_eq!(var.binding.name, "`is`");
    }

    #[test]
    fn bare_names_without_let_are_not_bindings() {
        let text = "Account.pro(label: let text, count)";
        let map = SourceMap::new(text);
        let Pattern::EnumCase(pattern) = parse_pattern(&tokens(text), &map) else {
            panic!("expected an enum case pattern");
        };
        assert_eq!(pattern.path, vec!["Account".to_string(), "pro".to_string()]);
        let payload = pattern.payload.expect("payload");
        assert_eq!(payload.elements[0].label.as_deref(), Some("label"));
        assert_eq!(payload.elements[0].binding.as_ref().map(|b| b.name.as_str()), Some("text"));
        assert_eq!(payload.elements[1].binding, None);
    }
}
