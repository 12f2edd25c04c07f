use crate::attribute::read_attributes;
use crate::cursor::Cursor;
use crate::error::{ParseErrorKind, ParseResult};
use crate::node::{Attribute, Node};
use crate::repeat::read_repeat;
use crate::text::read_text;

/// Characters allowed in element names, class names and ids
pub fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':' | '$' | '@' | '!' | '%')
}

/// Reads one element (`name.class#id[attrs]{text}*N/`) into a new node.
///
/// Stops without consuming at the first character that does not belong to
/// the element, typically an operator left for the caller.
pub fn read_element(cursor: &mut Cursor<'_>) -> ParseResult<Node> {
    let start = cursor.pos();
    let mut node = Node::new();

    while let Some(ch) = cursor.peek() {
        match ch {
            '.' => {
                cursor.advance();
                node.add_class(cursor.consume_while(is_name_char));
            }
            '#' => {
                cursor.advance();
                let id = cursor.consume_while(is_name_char);
                node.set_attribute(Attribute::named("id", id));
            }
            '[' => {
                for attribute in read_attributes(cursor)?.unwrap_or_default() {
                    node.set_attribute(attribute);
                }
            }
            '{' => {
                let text = read_text(cursor)?.map(String::from);
                node.set_value(text);
            }
            '*' => {
                node.set_repeat(read_repeat(cursor));
            }
            '/' => {
                // only a concrete element can be self-closing
                if node.is_group() {
                    return Err(cursor.error(ParseErrorKind::UnexpectedSelfClosing));
                }
                cursor.advance();
                node.set_self_closing(true);
                if let Some(repeat) = read_repeat(cursor) {
                    node.set_repeat(Some(repeat));
                }
                break;
            }
            ch if is_name_char(ch) && node.name().is_none() && node.attributes().is_empty() => {
                let name = cursor.consume_while(is_name_char);
                node.set_name(Some(name.to_string()));
            }
            _ => break,
        }
    }

    if cursor.pos() == start {
        return Err(cursor.error(ParseErrorKind::EmptyNode {
            found: cursor.peek(),
        }));
    }

    tracing::trace!(name = node.name(), start, end = cursor.pos(), "element");
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Repeat, RepeatCount};

    fn read(source: &str) -> Node {
        read_element(&mut Cursor::new(source)).unwrap()
    }

    /// `<name attr="value">text</name>` style dump used to compare nodes
    fn dump(node: &Node) -> String {
        let name = node.name().unwrap_or("?");
        let repeat = match node.repeat().map(|r| r.count) {
            Some(RepeatCount::Exact(count)) => format!("*{}", count),
            Some(RepeatCount::Unbounded) => "*".to_string(),
            None => String::new(),
        };
        let attrs: String = node
            .attributes()
            .iter()
            .map(|a| format!(" {}=\"{}\"", a.name, a.value_string().unwrap_or_default()))
            .collect();

        if node.self_closing() {
            format!("<{}{}{} />", name, repeat, attrs)
        } else {
            let text = node.value().unwrap_or("");
            format!("<{}{}{}>{}</{}>", name, repeat, attrs, text, name)
        }
    }

    fn parse(source: &str) -> String {
        dump(&read(source))
    }

    #[test]
    fn test_simple() {
        assert_eq!(parse("div"), "<div></div>");
        assert_eq!(parse("div.foo"), r#"<div class="foo"></div>"#);
        assert_eq!(parse("div#foo"), r#"<div id="foo"></div>"#);
        assert_eq!(parse("div#foo.bar"), r#"<div id="foo" class="bar"></div>"#);
        assert_eq!(parse("div.foo#bar"), r#"<div class="foo" id="bar"></div>"#);
        assert_eq!(parse("div.foo.bar.baz"), r#"<div class="foo bar baz"></div>"#);
        assert_eq!(parse(".foo"), r#"<? class="foo"></?>"#);
        assert_eq!(parse("#foo"), r#"<? id="foo"></?>"#);
        assert_eq!(parse("#foo.bar"), r#"<? id="foo" class="bar"></?>"#);

        assert_eq!(parse("."), r#"<? class=""></?>"#);
        assert_eq!(parse("#"), r#"<? id=""></?>"#);
        assert_eq!(parse("#."), r#"<? id="" class=""></?>"#);
        assert_eq!(parse(".#."), r#"<? class="" id=""></?>"#);
    }

    #[test]
    fn test_with_attributes() {
        assert_eq!(parse("div[foo=bar]"), r#"<div foo="bar"></div>"#);
        assert_eq!(parse("div.a[b=c]"), r#"<div class="a" b="c"></div>"#);
        assert_eq!(parse("div[b=c].a"), r#"<div b="c" class="a"></div>"#);
        assert_eq!(parse(r#"div[a=b][c="d"]"#), r#"<div a="b" c="d"></div>"#);
        assert_eq!(parse("div[a=b][a=c]"), r#"<div a="c"></div>"#);

        assert_eq!(parse("[b=c]"), r#"<? b="c"></?>"#);
        assert_eq!(parse(".a[b=c]"), r#"<? class="a" b="c"></?>"#);
        assert_eq!(parse("[b=c].a#d"), r#"<? b="c" class="a" id="d"></?>"#);
    }

    #[test]
    fn test_name_not_read_after_attributes() {
        let mut cursor = Cursor::new("[b=c]a");
        let node = read_element(&mut cursor).unwrap();
        assert_eq!(node.name(), None);
        assert_eq!(cursor.peek(), Some('a'));
    }

    #[test]
    fn test_repeated_id_last_wins() {
        assert_eq!(parse("a#x#y"), r#"<a id="y"></a>"#);
    }

    #[test]
    fn test_with_text() {
        assert_eq!(parse("div{foo}"), "<div>foo</div>");
        let node = read("{foo}");
        assert_eq!(node.value(), Some("foo"));
        assert_eq!(node.name(), None);
        assert!(!node.is_group());
    }

    #[test]
    fn test_mixed() {
        assert_eq!(parse("div.foo{bar}"), r#"<div class="foo">bar</div>"#);
        assert_eq!(parse(".foo{bar}#baz"), r#"<? class="foo" id="baz">bar</?>"#);
        assert_eq!(parse(".foo[b=c]{bar}"), r#"<? class="foo" b="c">bar</?>"#);
    }

    #[test]
    fn test_repeated() {
        assert_eq!(parse("div.foo*3"), r#"<div*3 class="foo"></div>"#);
        assert_eq!(parse(".a[b=c]*10"), r#"<?*10 class="a" b="c"></?>"#);
        assert_eq!(parse(".a*10[b=c]"), r#"<?*10 class="a" b="c"></?>"#);
        assert_eq!(parse(".a*10{text}"), r#"<?*10 class="a">text</?>"#);
        assert_eq!(read("li*").repeat(), Some(&Repeat::new(RepeatCount::Unbounded)));
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(parse("div/"), "<div />");
        assert_eq!(parse(".foo/"), r#"<? class="foo" />"#);
        assert_eq!(parse(".foo[bar]/"), r#"<? class="foo" bar="" />"#);
        assert_eq!(parse(".foo/*3"), r#"<?*3 class="foo" />"#);
        assert_eq!(parse(".foo*3/"), r#"<?*3 class="foo" />"#);
    }

    #[test]
    fn test_self_closing_stops_element() {
        let mut cursor = Cursor::new("img/.foo");
        let node = read_element(&mut cursor).unwrap();
        assert!(node.self_closing());
        assert!(!node.has_attribute("class"));
        assert_eq!(cursor.peek(), Some('.'));
    }

    #[test]
    fn test_self_closing_on_group_fails() {
        let err = read_element(&mut Cursor::new("/")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedSelfClosing);
        assert_eq!(err.pos, 0);

        let err = read_element(&mut Cursor::new("*2/")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedSelfClosing);
        assert_eq!(err.pos, 2);
    }

    #[test]
    fn test_empty_node() {
        let err = read_element(&mut Cursor::new(">a")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyNode { found: Some('>') });
        assert_eq!(err.pos, 0);
    }
}
