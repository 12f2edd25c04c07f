use crate::element::is_name_char;
use crate::node::{
    Attribute, AttributeName, AttributeOptions, AttributeValue, Node, NodeId, Repeat, RepeatCount,
};
use crate::tree::Tree;
use std::fmt::Write;

/// Serializer writes a tree back in abbreviation notation
///
/// The output is compact (`ul>li.item*3+p{text}`), with `.class` and `#id`
/// shorthands where the value allows it and everything else in a single
/// `[...]` list. Parsing the output of a freshly parsed tree gives back an
/// equivalent tree. A quoted value that holds both quote characters is
/// written with its bare `"` escaped, and reads back with the backslash kept.
///
/// Unrolled nodes carry their copy number as `*N@k`. That form is meant for
/// inspection and does not parse again; turn it off with `with_stamps(false)`.
pub struct Serializer {
    stamps: bool,
}

impl Serializer {
    pub fn new() -> Self {
        Self { stamps: true }
    }

    /// Whether unrolled repeats are written as `*N@k` or plain `*N`
    pub fn with_stamps(mut self, stamps: bool) -> Self {
        self.stamps = stamps;
        self
    }

    /// Serialize the children of the tree's root
    pub fn serialize(&self, tree: &Tree) -> String {
        let mut output = String::new();
        self.serialize_children(tree, tree.root(), &mut output);
        output
    }

    /// Serialize the subtree rooted at `id`, node included
    pub fn serialize_node(&self, tree: &Tree, id: NodeId) -> String {
        let mut output = String::new();
        self.write_node(tree, id, &mut output);
        output
    }

    fn serialize_children(&self, tree: &Tree, parent: NodeId, output: &mut String) {
        self.write_steps(tree, vec![Step::Children(parent)], output);
    }

    fn write_node(&self, tree: &Tree, id: NodeId, output: &mut String) {
        self.write_steps(tree, vec![Step::Node(id)], output);
    }

    /// Drains a stack of pending output, so deep trees need no recursion
    fn write_steps<'t>(&self, tree: &'t Tree, mut steps: Vec<Step<'t>>, output: &mut String) {
        while let Some(step) = steps.pop() {
            match step {
                Step::Text(text) => output.push_str(text),
                Step::Repeat(repeat) => self.write_repeat(repeat, output),
                Step::Node(id) => {
                    let node = &tree[id];
                    if node.is_group() {
                        output.push('(');
                        steps.extend(node.repeat().map(Step::Repeat));
                        steps.push(Step::Text(")"));
                        steps.push(Step::Children(id));
                        continue;
                    }

                    self.write_element(node, output);
                    if tree.has_children(id) {
                        output.push('>');
                        steps.push(Step::Children(id));
                    }
                }
                Step::Children(parent) => {
                    let children: Vec<NodeId> = tree.children(parent).collect();
                    for (i, &child) in children.iter().enumerate().rev() {
                        let last = i + 1 == children.len();
                        // a following sibling would otherwise land among this node's children
                        let wrap = !last && !tree[child].is_group() && tree.has_children(child);

                        if !last {
                            steps.push(Step::Text("+"));
                        }
                        if wrap {
                            steps.push(Step::Text(")"));
                        }
                        steps.push(Step::Node(child));
                        if wrap {
                            steps.push(Step::Text("("));
                        }
                    }
                }
            }
        }
    }

    fn write_element(&self, node: &Node, output: &mut String) {
        if let Some(name) = node.name() {
            output.push_str(name);
        }

        // consecutive attributes without a shorthand share one list
        let mut list: Vec<&Attribute> = Vec::new();
        for attribute in node.attributes() {
            match shorthand(attribute) {
                Some(short) => {
                    self.write_attribute_list(&list, output);
                    list.clear();
                    output.push_str(&short);
                }
                None => list.push(attribute),
            }
        }
        self.write_attribute_list(&list, output);

        if let Some(value) = node.value() {
            output.push('{');
            output.push_str(value);
            output.push('}');
        }

        if let Some(repeat) = node.repeat() {
            self.write_repeat(repeat, output);
        }

        if node.self_closing() {
            output.push('/');
        }
    }

    fn write_attribute_list(&self, attributes: &[&Attribute], output: &mut String) {
        if attributes.is_empty() {
            return;
        }

        output.push('[');
        for (i, attribute) in attributes.iter().enumerate() {
            if i > 0 {
                output.push(' ');
            }
            self.write_attribute(attribute, output);
        }
        output.push(']');
    }

    fn write_attribute(&self, attribute: &Attribute, output: &mut String) {
        let value = attribute.value_string();

        let name = match &attribute.name {
            AttributeName::Anonymous => {
                write_quoted(value.as_deref().unwrap_or(""), output);
                return;
            }
            AttributeName::Named(name) => name,
        };

        let options = &attribute.options;
        if options.implied {
            output.push('!');
        }
        output.push_str(name);
        if options.boolean {
            output.push('.');
        }

        let Some(value) = value else {
            return;
        };
        output.push('=');
        if is_expression(options) {
            output.push('{');
            output.push_str(&value);
            output.push('}');
        } else {
            write_quoted(&value, output);
        }
    }

    fn write_repeat(&self, repeat: &Repeat, output: &mut String) {
        output.push('*');
        if let RepeatCount::Exact(count) = repeat.count {
            let _ = write!(output, "{}", count);
        }
        if let (true, Some(value)) = (self.stamps, repeat.value) {
            let _ = write!(output, "@{}", value);
        }
    }
}

/// Output still to be written, popped last-in first-out
enum Step<'t> {
    Node(NodeId),
    Children(NodeId),
    Repeat(&'t Repeat),
    Text(&'static str),
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_expression(options: &AttributeOptions) -> bool {
    options.before.as_deref() == Some("{") && options.after.as_deref() == Some("}")
}

fn is_name(text: &str) -> bool {
    text.chars().all(is_name_char)
}

/// `.a.b` for class tokens and `#x` for ids, when the parser would read the
/// shorthand back into the same attribute
fn shorthand(attribute: &Attribute) -> Option<String> {
    if attribute.options != AttributeOptions::default() {
        return None;
    }

    match (attribute.name.as_str()?, attribute.value.as_ref()?) {
        ("class", AttributeValue::Tokens(tokens)) => {
            if tokens.is_empty() {
                return Some(".".to_string());
            }
            if !tokens.iter().all(|token| is_name(token)) {
                return None;
            }
            Some(tokens.iter().map(|token| format!(".{}", token)).collect())
        }
        ("id", AttributeValue::Text(id)) if is_name(id) => Some(format!("#{}", id)),
        _ => None,
    }
}

fn write_quoted(value: &str, output: &mut String) {
    let quote = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };

    output.push(quote);
    // an escaped character is copied as is; a bare quote gets escaped
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            output.push('\\');
        }
        output.push(ch);
    }
    // a trailing lone backslash would swallow the closing quote
    if escaped {
        output.push('\\');
    }
    output.push(quote);
}

/// Convenience function to serialize a tree
pub fn serialize(tree: &Tree) -> String {
    Serializer::new().serialize(tree)
}
