use crate::cursor::Cursor;
use crate::error::{ParseErrorKind, ParseResult};

pub fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

/// Reads a `"..."` or `'...'` literal and returns its inner text.
///
/// Escapes are kept verbatim in the result; they only stop the literal from
/// being closed early. Returns `Ok(None)` without consuming anything when the
/// cursor is not on a quote.
pub fn read_quoted<'src>(cursor: &mut Cursor<'src>) -> ParseResult<Option<&'src str>> {
    let quote = match cursor.peek() {
        Some(ch) if is_quote(ch) => ch,
        _ => return Ok(None),
    };

    cursor.advance();
    let start = cursor.pos();
    if !cursor.skip_quoted(quote) {
        let end = cursor.source().len();
        return Err(cursor.error_at(ParseErrorKind::UnterminatedLiteral { quote }, end));
    }

    Ok(Some(cursor.slice(start, cursor.pos() - quote.len_utf8())))
}
