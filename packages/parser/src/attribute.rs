use crate::cursor::Cursor;
use crate::error::{ParseErrorKind, ParseResult};
use crate::node::{Attribute, AttributeName, AttributeOptions};
use crate::quoted::{is_quote, read_quoted};
use crate::text::read_text;

fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{a0}'
}

fn is_unquoted_value_char(ch: char) -> bool {
    !is_space(ch) && !matches!(ch, '[' | ']' | '{' | '}' | '=') && !is_quote(ch)
}

fn is_attribute_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':' | '$' | '@')
}

/// `!?[\w\-:$@]+\.?`
fn is_attribute_name(token: &str) -> bool {
    let token = token.strip_prefix('!').unwrap_or(token);
    let token = token.strip_suffix('.').unwrap_or(token);
    !token.is_empty() && token.chars().all(is_attribute_name_char)
}

/// Reads an unquoted value. A balanced `{...}` that follows other value
/// characters stays part of the value, so `${1:name}` reads as one token.
fn read_unquoted<'src>(cursor: &mut Cursor<'src>) -> ParseResult<&'src str> {
    let start = cursor.pos();
    loop {
        cursor.eat_while(is_unquoted_value_char);
        if cursor.pos() == start || cursor.peek() != Some('{') {
            break;
        }
        read_text(cursor)?;
    }
    Ok(cursor.slice(start, cursor.pos()))
}

/// Reads a `[...]` attribute list.
///
/// Example: `[attr col=3 title="Quoted string" selected. support={react}]`
///
/// Returns `Ok(None)` when the cursor is not on `[`.
pub fn read_attributes(cursor: &mut Cursor<'_>) -> ParseResult<Option<Vec<Attribute>>> {
    if !cursor.eat('[') {
        return Ok(None);
    }

    let mut result = Vec::new();

    while !cursor.at_end() {
        cursor.eat_while(is_space);

        if cursor.eat(']') {
            return Ok(Some(result));
        }

        if let Some(value) = read_quoted(cursor)? {
            result.push(Attribute::anonymous(value));
            continue;
        }

        let token_start = cursor.pos();
        let token = read_unquoted(cursor)?;
        if token.is_empty() {
            if cursor.at_end() {
                break;
            }
            return Err(cursor.error(ParseErrorKind::MissingAttributeName));
        }

        if !is_attribute_name(token) {
            result.push(Attribute::anonymous(token));
            continue;
        }

        let mut options = AttributeOptions::default();
        let mut name = token;
        if let Some(stripped) = name.strip_prefix('!') {
            options.implied = true;
            name = stripped;
        }
        if let Some(stripped) = name.strip_suffix('.') {
            options.boolean = true;
            name = stripped;
        }

        let mut value = None;
        if cursor.eat('=') {
            if let Some(quoted) = read_quoted(cursor)? {
                value = Some(quoted.to_string());
            } else if let Some(expression) = read_text(cursor)? {
                value = Some(expression.to_string());
                options.before = Some("{".to_string());
                options.after = Some("}".to_string());
            } else {
                value = Some(read_unquoted(cursor)?.to_string());
            }
        }

        tracing::trace!(name, start = token_start, "attribute");
        result.push(Attribute::new(AttributeName::named(name), value).with_options(options));
    }

    Err(cursor.error(ParseErrorKind::UnterminatedAttributeList))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AttributeValue;

    fn read(source: &str) -> Vec<Attribute> {
        read_attributes(&mut Cursor::new(source)).unwrap().unwrap()
    }

    fn pairs(source: &str) -> Vec<(Option<String>, Option<String>)> {
        read(source)
            .into_iter()
            .map(|attr| (attr.name.as_str().map(String::from), attr.value_string()))
            .collect()
    }

    fn named(name: &str, value: Option<&str>) -> (Option<String>, Option<String>) {
        (Some(name.to_string()), value.map(String::from))
    }

    fn anonymous(value: &str) -> (Option<String>, Option<String>) {
        (None, Some(value.to_string()))
    }

    #[test]
    fn test_names() {
        assert_eq!(pairs("[a]"), vec![named("a", None)]);
        assert_eq!(
            pairs("[a b c]"),
            vec![named("a", None), named("b", None), named("c", None)]
        );
        assert!(read("[]").is_empty());
        assert_eq!(pairs("[  a\u{a0}b ]"), vec![named("a", None), named("b", None)]);
    }

    #[test]
    fn test_unquoted_values() {
        assert_eq!(pairs("[a=b]"), vec![named("a", Some("b"))]);
        assert_eq!(
            pairs("[a=b c= d=e]"),
            vec![named("a", Some("b")), named("c", Some("")), named("d", Some("e"))]
        );
        assert_eq!(
            pairs("[a=b.c d=тест]"),
            vec![named("a", Some("b.c")), named("d", Some("тест"))]
        );
    }

    #[test]
    fn test_quoted_values() {
        assert_eq!(pairs(r#"[a="b"]"#), vec![named("a", Some("b"))]);
        assert_eq!(
            pairs(r#"[a="b" c='d' e=""]"#),
            vec![named("a", Some("b")), named("c", Some("d")), named("e", Some(""))]
        );
        assert_eq!(
            pairs(r#"[a="foo'bar" b='foo"bar' c="foo\"bar"]"#),
            vec![
                named("a", Some("foo'bar")),
                named("b", Some("foo\"bar")),
                named("c", Some("foo\\\"bar")),
            ]
        );
    }

    #[test]
    fn test_boolean_and_implied() {
        let attrs = read("[a. b. !c !d.]");
        assert_eq!(attrs.len(), 4);
        assert!(attrs[0].name.is("a") && attrs[0].options.boolean && attrs[0].value.is_none());
        assert!(attrs[1].name.is("b") && attrs[1].options.boolean);
        assert!(attrs[2].name.is("c") && attrs[2].options.implied && !attrs[2].options.boolean);
        assert!(attrs[3].name.is("d") && attrs[3].options.implied && attrs[3].options.boolean);
    }

    #[test]
    fn test_expression_values() {
        let attrs = read(r#"[foo={1 + 2} bar={fn(1, "foo")}]"#);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].value, Some(AttributeValue::Text("1 + 2".to_string())));
        assert_eq!(attrs[0].options.before.as_deref(), Some("{"));
        assert_eq!(attrs[0].options.after.as_deref(), Some("}"));
        assert_eq!(attrs[1].value_string().as_deref(), Some(r#"fn(1, "foo")"#));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(pairs("[a.b]"), vec![anonymous("a.b")]);
        assert_eq!(
            pairs(r#"[a.b "c=d" foo=bar ./test.html]"#),
            vec![
                anonymous("a.b"),
                anonymous("c=d"),
                named("foo", Some("bar")),
                anonymous("./test.html"),
            ]
        );
    }

    #[test]
    fn test_tabstops_as_unquoted_values() {
        assert_eq!(
            pairs("[name=${1} value=${2:test}]"),
            vec![named("name", Some("${1}")), named("value", Some("${2:test}"))]
        );
    }

    #[test]
    fn test_class_attribute_is_tokenised() {
        let attrs = read(r#"[class="a b a"]"#);
        assert_eq!(
            attrs[0].value,
            Some(AttributeValue::Tokens(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[test]
    fn test_absent_list() {
        let mut cursor = Cursor::new("a]");
        assert_eq!(read_attributes(&mut cursor).unwrap(), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_errors() {
        let err = read_attributes(&mut Cursor::new("[a")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedAttributeList);
        assert_eq!(err.pos, 2);

        let err = read_attributes(&mut Cursor::new(r#"[a="foo]"#)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedLiteral { quote: '"' });

        let err = read_attributes(&mut Cursor::new("[a={foo]")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedTextNode);

        let err = read_attributes(&mut Cursor::new("[a=b=c]")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingAttributeName);
        assert_eq!(err.pos, 4);
    }
}
