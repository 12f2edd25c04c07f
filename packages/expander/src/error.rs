use abbrev_parser::ParseError;
use thiserror::Error;

pub type ExpandResult<T> = Result<T, ExpandError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A bare `*` repeat was found while expanding in strict mode. `pos` is
    /// the node's pre-order position below the root.
    #[error("Repeat without a count on node {pos} is not allowed in strict mode")]
    UnboundedRepeat { pos: usize },
}
