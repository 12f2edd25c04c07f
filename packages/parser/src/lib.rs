//! Parser for element abbreviations such as `ul>li.item*3>a[href]{text}`.
//!
//! `parse` turns an abbreviation into a `Tree` of nodes. Repeat markers are
//! recorded but not expanded here; see the `abbrev-expander` crate.

pub mod attribute;
pub mod cursor;
pub mod element;
pub mod error;
pub mod node;
pub mod parser;
pub mod quoted;
pub mod repeat;
pub mod serializer;
pub mod text;
pub mod tree;

pub use attribute::read_attributes;
pub use cursor::{CharPattern, Cursor};
pub use element::read_element;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use node::{
    Attribute, AttributeName, AttributeOptions, AttributeValue, Node, NodeId, NodeKind, Repeat,
    RepeatCount,
};
pub use parser::{parse, Parser};
pub use quoted::read_quoted;
pub use repeat::read_repeat;
pub use serializer::{serialize, Serializer};
pub use text::read_text;
pub use tree::{Children, Descendants, Tree};
