use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// What went wrong while reading an abbreviation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Unable to consume abbreviation node, unexpected {}", found_char(.found))]
    EmptyNode { found: Option<char> },

    #[error("Unexpected self-closing indicator")]
    UnexpectedSelfClosing,

    #[error("Expected attribute name or default value")]
    MissingAttributeName,

    #[error("Expected closing \"]\" brace in attribute set")]
    UnterminatedAttributeList,

    #[error("Unable to find matching }} for text node")]
    UnterminatedTextNode,

    #[error("Unable to find matching {quote} for string literal")]
    UnterminatedLiteral { quote: char },

    #[error("Unexpected \")\" group end")]
    UnmatchedGroupClose,

    #[error("Expected group close")]
    UnclosedGroup,
}

fn found_char(found: &Option<char>) -> String {
    match found {
        Some(ch) => format!("{:?}", ch),
        None => "end of input".to_string(),
    }
}

/// A parse failure pinned to a byte offset of the (trimmed) abbreviation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at char {} of \"{input}\"", .pos + 1)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub pos: usize,
    pub input: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, pos: usize, input: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            input: input.into(),
        }
    }

    /// Message without the location suffix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Pretty-print the error with a source snippet using ariadne
    #[cfg(feature = "pretty-errors")]
    pub fn report(&self, filename: &str) -> String {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let len = self.input.len();
        let start = self.pos.min(len);
        let end = (start + 1).min(len);

        let mut output = Vec::new();
        let report = Report::build(ReportKind::Error, filename, start)
            .with_message(self.message())
            .with_label(
                Label::new((filename, start..end))
                    .with_color(Color::Red)
                    .with_message(self.label()),
            )
            .finish();

        if report
            .write((filename, Source::from(self.input.as_str())), &mut output)
            .is_err()
        {
            return self.to_string();
        }

        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    #[cfg(feature = "pretty-errors")]
    fn label(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::EmptyNode { .. } => "expected element, group or text",
            ParseErrorKind::UnexpectedSelfClosing => "`/` needs a named element",
            ParseErrorKind::MissingAttributeName => "expected attribute",
            ParseErrorKind::UnterminatedAttributeList => "missing `]`",
            ParseErrorKind::UnterminatedTextNode => "missing `}`",
            ParseErrorKind::UnterminatedLiteral { .. } => "missing closing quote",
            ParseErrorKind::UnmatchedGroupClose => "no group to close",
            ParseErrorKind::UnclosedGroup => "group opened here",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_points_at_one_based_char() {
        let err = ParseError::new(ParseErrorKind::UnmatchedGroupClose, 1, "a)");
        assert_eq!(err.to_string(), "Unexpected \")\" group end at char 2 of \"a)\"");
        assert_eq!(err.message(), "Unexpected \")\" group end");
    }

    #[test]
    fn test_empty_node_message_names_character() {
        let err = ParseError::new(ParseErrorKind::EmptyNode { found: Some('>') }, 0, ">");
        assert!(err.message().contains("'>'"));

        let err = ParseError::new(ParseErrorKind::EmptyNode { found: None }, 2, "a+");
        assert!(err.message().contains("end of input"));
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_report_mentions_message() {
        let err = ParseError::new(ParseErrorKind::UnterminatedTextNode, 4, "{foo");
        let report = err.report("abbr");
        assert!(report.contains("Unable to find matching } for text node"));
    }
}
