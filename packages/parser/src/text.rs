use crate::cursor::Cursor;
use crate::error::{ParseErrorKind, ParseResult};
use crate::quoted::read_quoted;

/// Reads a `{...}` text payload and returns it without the outer braces.
///
/// Nested braces must balance. Quoted literals inside the payload are
/// skipped as a whole, so braces within quotes do not count, and a
/// backslash protects the next character. Returns `Ok(None)` when the cursor
/// is not on `{`.
pub fn read_text<'src>(cursor: &mut Cursor<'src>) -> ParseResult<Option<&'src str>> {
    if cursor.peek() != Some('{') {
        return Ok(None);
    }

    let start = cursor.pos() + 1;
    let mut depth = 0usize;

    while !cursor.at_end() {
        if read_quoted(cursor)?.is_some() {
            continue;
        }

        match cursor.advance() {
            Some('{') => depth += 1,
            Some('}') => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(cursor.slice(start, cursor.pos() - 1)));
                }
            }
            Some('\\') => {
                cursor.advance();
            }
            _ => {}
        }
    }

    Err(cursor.error(ParseErrorKind::UnterminatedTextNode))
}
