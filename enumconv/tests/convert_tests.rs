use std::io::Write;
use std::sync::OnceLock;

use enumconv::{
    ConvertError, ConvertOptions, Converter, FactoryPlacement, ReturnStyle, convert_union_to_record,
    convert_union_to_record_file,
};
use rstest::rstest;

fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const BEGINNER: &str = r#"enum Test {
case beginner

var text: String {
switch self {
case .beginner:
return "a beginner"
}
}
}"#;

const ACCOUNT: &str = r#"
enum Account {
    case normal(text: String, number: Int)
    case pro(String, Int)

    var text: String {
        switch self {
        case .normal(let text, _):
            return text
        case .pro(let text, _):
            return "Pro: " + text
        }
    }

    var number: Int {
        switch self {
        case let .normal(_, number):
            return number
        case .pro(_, let n):
            return n * 2
        }
    }
}
"#;

#[test]
fn single_simple_case() {
    init_test_logger();
    let expected = r#"struct Test {
var text: String

static var beginner: Test {
return .init(text: "a beginner")
}
}
"#;
    assert_eq!(convert_union_to_record(BEGINNER).unwrap(), expected);
}

#[test]
fn payload_cases_become_functions() {
    init_test_logger();
    let expected = r#"struct Account {
var text: String
var number: Int

static func normal(text: String, number: Int) -> Account {
return .init(text: text, number: number)
}
static func pro(value0: String, value1: Int) -> Account {
return .init(text: "Pro: " + value0, number: value1 * 2)
}
}
"#;
    assert_eq!(convert_union_to_record(ACCOUNT).unwrap(), expected);
}

#[test]
fn missing_arm_is_non_exhaustive() {
    init_test_logger();
    let source = ACCOUNT.replace(
        "        case .pro(_, let n):\n            return n * 2\n",
        "",
    );
    let err = convert_union_to_record(&source).unwrap_err();
    let ConvertError::NonExhaustiveMatch {
        property, variant, ..
    } = &err
    else {
        panic!("expected a non-exhaustive match, got {err:?}");
    };
    assert_eq!(property, "number");
    assert_eq!(variant, "pro");
    assert_eq!(
        err.to_string(),
        "15:5: property 'number' does not handle case 'pro'"
    );
}

#[test]
fn only_simple_cases_and_no_properties() {
    init_test_logger();
    let expected = "struct Level {\n\nstatic var low: Level {\nreturn .init()\n}\nstatic var high: Level {\nreturn .init()\n}\n}\n";
    assert_eq!(
        convert_union_to_record("enum Level { case low, high }").unwrap(),
        expected
    );
}

#[test]
fn renamed_bindings_use_parameter_names() {
    init_test_logger();
    let source = r#"
enum Message {
    case greeting(name: String, times: Int)

    var body: String {
        switch self {
        case .greeting(let who, let count):
            return String(repeating: who, count: count)
        }
    }
}
"#;
    let output = convert_union_to_record(source).unwrap();
    assert!(output.contains("static func greeting(name: String, times: Int) -> Message {"));
    assert!(output.contains("return .init(body: String(repeating: name, count: times))"));
    assert!(!output.contains("who"));
}

#[test]
fn renames_reach_into_interpolations() {
    init_test_logger();
    let source = r#"
enum Account {
    case pro(String, level: Int)

    var text: String {
        switch self {
        case .pro(let s, let l):
            return "Pro: \(s) at \(l + 1)" /// summary
        }
    }
}
"#;
    let output = convert_union_to_record(source).unwrap();
    assert!(output.contains("static func pro(value0: String, level: Int) -> Account {"));
    assert!(
        output.contains(r#"return .init(text: "Pro: \(value0) at \(level + 1)")"#),
        "{output}"
    );
}

#[rstest]
#[case::closed("lo...hi", "from...to")]
#[case::spaced("lo ... hi", "from ... to")]
#[case::half_open("lo..<hi", "from..<to")]
fn range_operands_are_renamed(#[case] body: &str, #[case] expected: &str) {
    init_test_logger();
    let source = format!(
        "enum Span {{ case span(from: Int, to: Int)\n var r: Range<Int> {{ switch self {{ case .span(let lo, let hi): return {body} }} }} }}"
    );
    let output = convert_union_to_record(&source).unwrap();
    assert!(output.contains(&format!("return .init(r: {expected})")), "{output}");
}

#[rstest]
#[case::line("return 1 /// one")]
#[case::block("return 1 /** one */")]
fn trailing_doc_comments_are_not_copied(#[case] arm: &str) {
    init_test_logger();
    let source = format!("enum E {{\n case a\n var t: Int {{\n switch self {{\n case .a: {arm}\n }}\n }}\n}}");
    let output = convert_union_to_record(&source).unwrap();
    assert!(output.contains("return .init(t: 1)\n"), "{output}");
}

#[rstest]
#[case::first(0)]
#[case::second(1)]
#[case::third(2)]
fn unlabeled_slots_use_positional_names(#[case] bound: usize) {
    init_test_logger();
    let mut elements = vec!["_"; 3];
    elements[bound] = "let x";
    let source = format!(
        "enum E {{ case c(Int, Int, Int)\n var v: Int {{ switch self {{ case .c({}): return x + 1 }} }} }}",
        elements.join(", ")
    );
    let output = convert_union_to_record(&source).unwrap();
    assert!(output.contains("static func c(value0: Int, value1: Int, value2: Int) -> E {"));
    assert!(output.contains(&format!("return .init(v: value{bound} + 1)")));
}

#[rstest]
#[case::no_enum("struct S { var x: Int }", "no enum declaration found in input")]
#[case::unknown_case(
    "enum E { case a\n var x: Int { switch self { case .a: return 1\n case .b: return 2 } } }",
    "2:2: property 'x' matches unknown case 'b'"
)]
#[case::duplicate_arm(
    "enum E { case a\n var x: Int { switch self { case .a: return 1\n case .a: return 2 } } }",
    "2:2: property 'x' matches case 'a' more than once"
)]
#[case::no_return(
    "enum E { case a, b\n var x: Int { switch self { case .a: return 1\n case .b: break } } }",
    "2:2: property 'x' has no return expression for case 'b'"
)]
fn error_messages(#[case] source: &str, #[case] message: &str) {
    init_test_logger();
    let err = convert_union_to_record(source).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn parse_errors_propagate() {
    init_test_logger();
    assert!(matches!(
        convert_union_to_record("enum E { case a"),
        Err(ConvertError::Parse(_))
    ));
}

#[test]
fn internal_labels_are_rejected() {
    init_test_logger();
    let err = convert_union_to_record("enum E {\ncase a(outer inner: Int)\n}").unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedGrammar { .. }));
    assert!(err.to_string().starts_with("2:"));
}

#[test]
fn extension_placement_with_implicit_returns() {
    init_test_logger();
    let source = r#"
enum Test {
    case beginner
    case normal(text: String)
    case advanced(custom: String)

    var text: String {
        switch self {
        case .beginner: return "beginner"
        case .normal(let text): return text
        case .advanced(let custom): return custom
        }
    }
}
"#;
    let expected = r#"struct Test {
var text: String
}

extension Test {
static var beginner: Test {
.init(text: "beginner")
}
static func normal(text: String) -> Test {
.init(text: text)
}
static func advanced(custom: String) -> Test {
.init(text: custom)
}
}
"#;
    let converter = Converter::new(
        ConvertOptions::new()
            .with_return_style(ReturnStyle::Implicit)
            .with_factory_placement(FactoryPlacement::Extension),
    );
    assert_eq!(converter.convert_str(source).unwrap(), expected);
}

#[test]
fn options_from_json_file() {
    init_test_logger();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "indent_width": 2, "field_keyword": "let" }}"#).unwrap();
    let options = ConvertOptions::from_json_file(file.path()).unwrap();
    let output = Converter::new(options).convert_str(BEGINNER).unwrap();
    assert_eq!(
        output,
        "struct Test {\n  let text: String\n\n  static var beginner: Test {\n    return .init(text: \"a beginner\")\n  }\n}\n"
    );
}

#[test]
fn missing_options_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ConvertOptions::from_json_file(dir.path().join("options.json")),
        Err(ConvertError::OptionsIo { .. })
    ));
}

#[test]
fn converts_from_path() {
    init_test_logger();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BEGINNER.as_bytes()).unwrap();
    assert_eq!(
        convert_union_to_record_file(file.path()).unwrap(),
        convert_union_to_record(BEGINNER).unwrap()
    );
}

#[test]
fn missing_source_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        convert_union_to_record_file(dir.path().join("missing.swift")),
        Err(ConvertError::Parse(enumconv_syntax::ParseError::Io { .. }))
    ));
}

#[test]
fn comments_and_spacing_in_arms_are_kept() {
    init_test_logger();
    let source = r#"
enum Size {
    case small(width: Int)
    var area: Int {
        switch self {
        case .small(let w):
            return w*w /* squared */ + 1
        }
    }
}
"#;
    let output = convert_union_to_record(source).unwrap();
    assert!(output.contains("return .init(area: width*width /* squared */ + 1)"));
}

mod property_tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    #[derive(Clone, Debug)]
    struct ArbitraryUnion {
        cases: Vec<(String, usize)>,
        properties: Vec<String>,
    }

    fn ident(g: &mut Gen, index: usize) -> String {
        let len = usize::arbitrary(g) % 6 + 1;
        let stem: String = (0..len)
            .map(|_| char::from(b'a' + (u8::arbitrary(g) % 26)))
            .collect();
        format!("{stem}{index}")
    }

    impl Arbitrary for ArbitraryUnion {
        fn arbitrary(g: &mut Gen) -> Self {
            let case_count = usize::arbitrary(g) % 4 + 1;
            let property_count = usize::arbitrary(g) % 6;
            ArbitraryUnion {
                cases: (0..case_count)
                    .map(|i| (format!("case{i}"), usize::arbitrary(g) % 3))
                    .collect(),
                properties: (0..property_count).map(|i| ident(g, i)).collect(),
            }
        }
    }

    impl ArbitraryUnion {
        fn source(&self) -> String {
            let mut source = String::from("enum Generated {\n");
            for (name, arity) in &self.cases {
                if *arity == 0 {
                    source.push_str(&format!("case {name}\n"));
                } else {
                    let payload = vec!["Int"; *arity].join(", ");
                    source.push_str(&format!("case {name}({payload})\n"));
                }
            }
            for property in &self.properties {
                source.push_str(&format!("var {property}: Int {{\nswitch self {{\n"));
                for (name, _) in &self.cases {
                    source.push_str(&format!("case .{name}: return 0\n"));
                }
                source.push_str("}\n}\n");
            }
            source.push_str("}\n");
            source
        }
    }

    quickcheck! {
        fn prop_fields_follow_declaration_order(union: ArbitraryUnion) -> bool {
            let Ok(output) = convert_union_to_record(&union.source()) else {
                return false;
            };
            let fields: Vec<&str> = output
                .lines()
                .filter_map(|line| line.strip_prefix("var "))
                .filter_map(|line| line.split(':').next())
                .collect();
            fields == union.properties.iter().map(String::as_str).collect::<Vec<_>>()
        }

        fn prop_one_factory_per_case(union: ArbitraryUnion) -> bool {
            let Ok(output) = convert_union_to_record(&union.source()) else {
                return false;
            };
            let factories = output.lines().filter(|line| line.starts_with("static ")).count();
            factories == union.cases.len()
        }
    }
}
