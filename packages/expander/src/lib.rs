//! Repeat expansion for parsed abbreviations
//!
//! ```
//! use abbrev_expander::{parse_and_expand, ExpandOptions};
//!
//! let tree = parse_and_expand("ul>li*3", &ExpandOptions::default()).unwrap();
//! let ul = tree.first_child(tree.root()).unwrap();
//! assert_eq!(tree.child_count(ul), 3);
//! ```

pub mod error;
pub mod options;
pub mod unroll;

pub use abbrev_parser::Tree;
pub use error::{ExpandError, ExpandResult};
pub use options::{ExpandOptions, NodeBudget};
pub use unroll::{unroll, unroll_limited, Expander, Expansion};

use tracing::instrument;

/// Parse `source` and expand its repeats in one step
#[instrument(level = "debug", skip(options), fields(len = source.len()))]
pub fn parse_and_expand(source: &str, options: &ExpandOptions) -> ExpandResult<Tree> {
    let mut tree = abbrev_parser::parse(source)?;
    Expander::new(options.clone()).expand(&mut tree)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_expand() {
        let tree = parse_and_expand("a*2+b", &ExpandOptions::default()).unwrap();
        assert_eq!(tree.child_count(tree.root()), 3);
    }

    #[test]
    fn test_parse_error_is_forwarded() {
        let err = parse_and_expand("a)", &ExpandOptions::default()).unwrap_err();
        assert!(matches!(err, ExpandError::Parse(_)));
    }
}
