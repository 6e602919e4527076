use carton_tokenizer::TokenKind;

use crate::block::Dialect;
use crate::error::{ParseError, ParseErrorKind};
use crate::object::{Object, ObjectNode};
use crate::parser::ObjectParser;
use crate::stream::TokenStream;

fn parse(source: &str) -> (Option<Object>, Vec<ParseError>) {
    let mut stream = TokenStream::new(source);
    let mut parser = ObjectParser::new(Dialect::default());
    let object = parser.parse(&mut stream, false);
    (object, parser.into_errors())
}

fn kinds(errors: &[ParseError]) -> Vec<&ParseErrorKind> {
    errors.iter().map(|error| &error.kind).collect()
}

#[test]
fn test_minimal_object() {
    let (object, errors) = parse(r#"object "root" { code { } }"#);
    let object = object.unwrap();
    assert!(errors.is_empty());
    assert_eq!(object.name, "root");
    assert!(object.code.is_some());
    assert!(object.sub_objects.is_empty());
}

#[test]
fn test_nested_objects_and_data() {
    let source = r#"
        object "root" {
            code { let x := 1 }
            object "child" {
                code { }
            }
            data "blob" hex"00ff"
            data "text" "AB"
        }
    "#;
    let (object, errors) = parse(source);
    let object = object.unwrap();
    assert!(errors.is_empty());
    assert_eq!(object.sub_objects.len(), 3);

    match object.sub_object("child").unwrap() {
        ObjectNode::Object(child) => {
            assert_eq!(child.name, "child");
            assert!(child.code.is_some());
        }
        other => panic!("expected object, got {other:?}"),
    }
    match object.sub_object("blob").unwrap() {
        ObjectNode::Data(data) => assert_eq!(data.content, vec![0x00, 0xff]),
        other => panic!("expected data, got {other:?}"),
    }
    match object.sub_object("text").unwrap() {
        ObjectNode::Data(data) => assert_eq!(data.content, b"AB".to_vec()),
        other => panic!("expected data, got {other:?}"),
    }
}

#[test]
fn test_code_only_shorthand() {
    let (object, errors) = parse("{ let x := 1 }");
    let object = object.unwrap();
    assert!(errors.is_empty());
    assert_eq!(object.name, "object");
    assert!(object.code.is_some());
    assert!(object.sub_objects.is_empty());
}

#[test]
fn test_duplicate_sibling_names_recoverable() {
    let source = r#"
        object "root" {
            code { }
            data "a" hex"01"
            data "a" hex"02"
        }
    "#;
    let (object, errors) = parse(source);
    let object = object.unwrap();
    assert_eq!(kinds(&errors), [&ParseErrorKind::DuplicateName("a".to_string())]);
    // Both children stay attached; the index points at the later one.
    assert_eq!(object.sub_objects.len(), 2);
    match object.sub_object("a").unwrap() {
        ObjectNode::Data(data) => assert_eq!(data.content, vec![0x02]),
        other => panic!("expected data, got {other:?}"),
    }
}

#[test]
fn test_child_named_like_container_recoverable() {
    let source = r#"
        object "root" {
            code { }
            data "root" hex"01"
        }
    "#;
    let (object, errors) = parse(source);
    let object = object.unwrap();
    assert_eq!(
        kinds(&errors),
        [&ParseErrorKind::NameCollisionWithContainer("root".to_string())]
    );
    // The offending child is attached regardless.
    assert_eq!(object.sub_objects.len(), 1);
}

#[test]
fn test_empty_name_recoverable() {
    let (object, errors) = parse(r#"object "" { code { } }"#);
    let object = object.unwrap();
    assert_eq!(kinds(&errors), [&ParseErrorKind::EmptyName]);
    assert_eq!(object.name, "");
}

#[test]
fn test_missing_object_keyword_fatal() {
    let (object, errors) = parse(r#"thing "root" { code { } }"#);
    assert!(object.is_none());
    assert_eq!(kinds(&errors), [&ParseErrorKind::ExpectedKeyword("object")]);
}

#[test]
fn test_missing_code_fatal() {
    let (object, errors) = parse(r#"object "root" { data "a" hex"01" }"#);
    assert!(object.is_none());
    assert_eq!(kinds(&errors), [&ParseErrorKind::ExpectedKeyword("code")]);
}

#[test]
fn test_stray_token_in_body_fatal() {
    let (object, errors) = parse(r#"object "root" { code { } banana }"#);
    assert!(object.is_none());
    assert_eq!(kinds(&errors), [&ParseErrorKind::ExpectedDataOrObject]);
}

#[test]
fn test_data_without_literal_fatal() {
    let (object, errors) = parse(r#"object "root" { code { } data "a" banana }"#);
    assert!(object.is_none());
    assert_eq!(
        kinds(&errors),
        [&ParseErrorKind::ExpectedToken {
            expected: TokenKind::StringLiteral,
            found: TokenKind::Identifier,
        }]
    );
}

#[test]
fn test_trailing_tokens_fatal() {
    let (object, errors) = parse(r#"object "root" { code { } } extra"#);
    assert!(object.is_none());
    assert_eq!(
        kinds(&errors),
        [&ParseErrorKind::ExpectedToken {
            expected: TokenKind::Eof,
            found: TokenKind::Identifier,
        }]
    );
}

#[test]
fn test_reuse_stream_allows_trailing_tokens() {
    let source = r#"object "first" { code { } } object "second" { code { } }"#;
    let mut stream = TokenStream::new(source);
    let mut parser = ObjectParser::new(Dialect::default());

    let first = parser.parse(&mut stream, true).unwrap();
    assert_eq!(first.name, "first");
    assert!(!parser.has_errors());

    let second = parser.parse(&mut stream, false).unwrap();
    assert_eq!(second.name, "second");
    assert!(!parser.has_errors());
}

#[test]
fn test_recursion_limit() {
    // Three levels of nesting against a limit of two.
    let source = r#"
        object "a" {
            code { }
            object "b" {
                code { }
                object "c" {
                    code { }
                }
            }
        }
    "#;
    let mut stream = TokenStream::new(source);
    let mut parser = ObjectParser::new(Dialect::default()).with_max_depth(2);
    let object = parser.parse(&mut stream, false);
    assert!(object.is_none());
    assert_eq!(
        kinds(parser.errors()),
        [&ParseErrorKind::RecursionLimitExceeded]
    );
}

#[test]
fn test_depth_resets_between_parses() {
    let source = r#"object "a" { code { } object "b" { code { } } }"#;
    let mut parser = ObjectParser::new(Dialect::default()).with_max_depth(2);

    let mut stream = TokenStream::new(source);
    assert!(parser.parse(&mut stream, false).is_some());

    let mut stream = TokenStream::new(source);
    assert!(parser.parse(&mut stream, false).is_some());
    assert!(!parser.has_errors());
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let mut source = String::new();
    for depth in 0..100 {
        source.push_str(&format!("object \"o{depth}\" {{ code {{ }} "));
    }
    source.push_str(&"}".repeat(100));
    let (object, errors) = parse(&source);
    assert!(errors.is_empty());
    assert_eq!(object.unwrap().name, "o0");
}

#[test]
fn test_parse_is_deterministic() {
    let source = r#"
        object "root" {
            code { let x := 1 }
            data "a" hex"0102"
            object "inner" { code { } }
        }
    "#;
    let (first, first_errors) = parse(source);
    let (second, second_errors) = parse(source);
    assert_eq!(first, second);
    assert_eq!(first_errors, second_errors);
}

#[test]
fn test_use_src_annotation_attaches_to_block() {
    let source = r#"
        object "root" {
            code /** @use-src 0:"contract.sol", 1:"lib.sol" */ { }
        }
    "#;
    let (object, errors) = parse(source);
    let object = object.unwrap();
    assert!(errors.is_empty());
    let names = object.code.unwrap().source_names.unwrap();
    assert_eq!(names[&0], "contract.sol");
    assert_eq!(names[&1], "lib.sol");
}

#[test]
fn test_malformed_annotation_ignored_silently() {
    let source = r#"
        object "root" {
            code /** @use-src 0:"broken *see above* */ { }
        }
    "#;
    let (object, errors) = parse(source);
    let object = object.unwrap();
    assert!(errors.is_empty());
    assert!(object.code.unwrap().source_names.is_none());
}

#[test]
fn test_annotation_on_code_only_shorthand() {
    let (object, errors) = parse("/// @use-src 0:\"a.sol\"\n{ }");
    let object = object.unwrap();
    assert!(errors.is_empty());
    let names = object.code.unwrap().source_names.unwrap();
    assert_eq!(names[&0], "a.sol");
}

#[test]
fn test_ordinary_comment_leaves_no_mapping() {
    let source = r#"
        object "root" {
            code // just a note
            { }
        }
    "#;
    let (object, errors) = parse(source);
    assert!(errors.is_empty());
    assert!(object.unwrap().code.unwrap().source_names.is_none());
}

#[test]
fn test_collision_check_against_immediate_container_only() {
    // "outer" reused one level down is fine; only direct children clash.
    let source = r#"
        object "outer" {
            code { }
            object "inner" {
                code { }
                data "outer" hex"00"
            }
        }
    "#;
    let (object, errors) = parse(source);
    assert!(errors.is_empty());
    assert!(object.is_some());
}
