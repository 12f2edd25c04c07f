use crate::cursor::Cursor;
use crate::node::{Repeat, RepeatCount};

/// Reads a `*N` or bare `*` repeat suffix. Not finding `*` is not an error.
pub fn read_repeat(cursor: &mut Cursor<'_>) -> Option<Repeat> {
    if !cursor.eat('*') {
        return None;
    }

    let digits = cursor.consume_while(|ch: char| ch.is_ascii_digit());
    let count = if digits.is_empty() {
        RepeatCount::Unbounded
    } else {
        // Only digits were consumed, so the parse can fail on overflow alone
        RepeatCount::Exact(digits.parse().unwrap_or(usize::MAX))
    };

    Some(Repeat::new(count))
}
