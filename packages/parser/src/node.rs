use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in its `Tree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Requested number of repetitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatCount {
    /// Bare `*` with no number
    Unbounded,
    Exact(usize),
}

impl RepeatCount {
    pub fn exact(self) -> Option<usize> {
        match self {
            RepeatCount::Unbounded => None,
            RepeatCount::Exact(count) => Some(count),
        }
    }
}

/// Repeat marker of a node.
///
/// `value` is `None` while the repeat is still pending and holds the 1-based
/// copy number once the node has been unrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub count: RepeatCount,
    pub value: Option<usize>,
}

impl Repeat {
    pub fn new(count: RepeatCount) -> Self {
        Self { count, value: None }
    }

    pub fn stamped(count: RepeatCount, value: usize) -> Self {
        Self {
            count,
            value: Some(value),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeName {
    /// Bare default value written without a key
    Anonymous,
    Named(String),
}

impl AttributeName {
    pub fn named(name: impl Into<String>) -> Self {
        AttributeName::Named(name.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeName::Anonymous => None,
            AttributeName::Named(name) => Some(name),
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.as_str() == Some(name)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeName::Anonymous => Ok(()),
            AttributeName::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Text(String),
    /// Token set used by `class`; no duplicates, first insertion order
    Tokens(Vec<String>),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::Tokens(tokens) => f.write_str(&tokens.join(" ")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOptions {
    /// Written as `name.`: the value is the name itself
    pub boolean: bool,
    /// Written as `!name`: emit only if a value is supplied later
    pub implied: bool,
    /// Delimiters to restore around an expression value, e.g. `{` and `}`
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: AttributeName,
    pub value: Option<AttributeValue>,
    pub options: AttributeOptions,
}

impl Attribute {
    /// Creates an attribute. A `class` value is split into tokens.
    pub fn new(name: AttributeName, value: Option<String>) -> Self {
        let value = if name.is("class") {
            Some(AttributeValue::Tokens(split_tokens(value.as_deref().unwrap_or(""))))
        } else {
            value.map(AttributeValue::Text)
        };

        Self {
            name,
            value,
            options: AttributeOptions::default(),
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(AttributeName::named(name), Some(value.into()))
    }

    pub fn anonymous(value: impl Into<String>) -> Self {
        Self::new(AttributeName::Anonymous, Some(value.into()))
    }

    pub fn with_options(mut self, options: AttributeOptions) -> Self {
        self.options = options;
        self
    }

    /// Value as a single string; class tokens are joined with spaces
    pub fn value_string(&self) -> Option<String> {
        self.value.as_ref().map(ToString::to_string)
    }
}

fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for token in text.split_whitespace() {
        push_token(&mut tokens, token);
    }
    tokens
}

fn push_token(tokens: &mut Vec<String>, token: &str) {
    if !token.is_empty() && !tokens.iter().any(|t| t == token) {
        tokens.push(token.to_string());
    }
}

/// Tagged view of what a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// No name, value or attributes: exists only to scope operators
    Group,
    Element,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Links {
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) previous: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

/// A node of the abbreviation tree. Structure lives in `Tree`; this holds
/// the node's own data plus its links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: Option<String>,
    value: Option<String>,
    attributes: Vec<Attribute>,
    repeat: Option<Repeat>,
    self_closing: bool,
    pub(crate) links: Links,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Copy of the node's data without any tree links
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            links: Links::default(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn repeat(&self) -> Option<&Repeat> {
        self.repeat.as_ref()
    }

    pub fn set_repeat(&mut self, repeat: Option<Repeat>) {
        self.repeat = repeat;
    }

    /// Repeat that still has to be unrolled
    pub fn pending_repeat(&self) -> Option<Repeat> {
        self.repeat.filter(Repeat::is_pending)
    }

    pub fn self_closing(&self) -> bool {
        self.self_closing
    }

    pub fn set_self_closing(&mut self, self_closing: bool) {
        self.self_closing = self_closing;
    }

    pub fn is_group(&self) -> bool {
        self.name.is_none() && self.value.is_none() && self.attributes.is_empty()
    }

    pub fn kind(&self) -> NodeKind {
        if self.is_group() {
            NodeKind::Group
        } else {
            NodeKind::Element
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name.is(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Replaces an attribute with the same name in place, or appends it
    pub fn set_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.name == attribute.name)
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|attr| attr.name.is(name))?;
        Some(self.attributes.remove(index))
    }

    /// Adds a class token. An empty token still creates the `class`
    /// attribute so that `.` alone yields `class=""`.
    pub fn add_class(&mut self, token: &str) {
        let token = token.trim();
        match self.class_tokens_mut() {
            Some(tokens) => push_token(tokens, token),
            None => self.set_attribute(Attribute::new(
                AttributeName::named("class"),
                Some(token.to_string()),
            )),
        }
    }

    pub fn has_class(&self, token: &str) -> bool {
        let token = token.trim();
        self.classes().iter().any(|t| t == token)
    }

    pub fn remove_class(&mut self, token: &str) {
        let token = token.trim();
        if let Some(tokens) = self.class_tokens_mut() {
            tokens.retain(|t| t != token);
        }
    }

    pub fn classes(&self) -> &[String] {
        match self.attribute("class").and_then(|attr| attr.value.as_ref()) {
            Some(AttributeValue::Tokens(tokens)) => tokens,
            _ => &[],
        }
    }

    fn class_tokens_mut(&mut self) -> Option<&mut Vec<String>> {
        let attr = self
            .attributes
            .iter_mut()
            .find(|attr| attr.name.is("class"))?;

        // `class` is always token based, even when set through a raw value
        let converted = match &attr.value {
            Some(AttributeValue::Text(text)) => Some(split_tokens(text)),
            _ => None,
        };
        if let Some(tokens) = converted {
            attr.value = Some(AttributeValue::Tokens(tokens));
        }

        match attr.value.get_or_insert_with(|| AttributeValue::Tokens(Vec::new())) {
            AttributeValue::Tokens(tokens) => Some(tokens),
            AttributeValue::Text(_) => None,
        }
    }
}
