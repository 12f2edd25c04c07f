//! Tests for parse failures
//!
//! Validates:
//! - Each error kind and the offset it reports
//! - Offsets refer to the trimmed source
//! - Display output carries message, position and input

use abbrev_parser::{parse, ParseError, ParseErrorKind};

fn fail(source: &str) -> ParseError {
    parse(source).unwrap_err()
}

#[test]
fn test_error_kinds_and_offsets() {
    let cases: &[(&str, ParseErrorKind, usize)] = &[
        ("a+>b", ParseErrorKind::EmptyNode { found: Some('>') }, 2),
        ("a>+", ParseErrorKind::EmptyNode { found: Some('+') }, 2),
        ("/", ParseErrorKind::UnexpectedSelfClosing, 0),
        ("a[=b]", ParseErrorKind::MissingAttributeName, 2),
        ("a[b=c", ParseErrorKind::UnterminatedAttributeList, 5),
        ("a{foo", ParseErrorKind::UnterminatedTextNode, 5),
        ("a[b='c]", ParseErrorKind::UnterminatedLiteral { quote: '\'' }, 7),
        ("a)", ParseErrorKind::UnmatchedGroupClose, 1),
        ("(a>(b", ParseErrorKind::UnclosedGroup, 0),
    ];

    for (source, kind, pos) in cases {
        let err = fail(source);
        assert_eq!(&err.kind, kind, "kind for {}", source);
        assert_eq!(err.pos, *pos, "offset for {}", source);
        assert_eq!(err.input, *source);
    }
}

#[test]
fn test_offset_is_relative_to_trimmed_source() {
    let err = fail("   a)  ");
    assert_eq!(err.pos, 1);
    assert_eq!(err.input(), "a)");
}

#[test]
fn test_display() {
    let err = fail("a)");
    assert_eq!(err.message(), "Unexpected \")\" group end");
    assert_eq!(err.to_string(), "Unexpected \")\" group end at char 2 of \"a)\"");
}

#[test]
fn test_outermost_unclosed_group() {
    let err = fail("x+(a>(b>(c)");
    assert_eq!(err.kind, ParseErrorKind::UnclosedGroup);
    assert_eq!(err.pos, 2);
}

#[cfg(feature = "pretty-errors")]
#[test]
fn test_pretty_report() {
    let report = fail("a[b=c").report("input.abbr");
    assert!(report.contains("input.abbr"));
    assert!(report.contains("Expected closing"));
}
