use crate::cursor::Cursor;
use crate::element::read_element;
use crate::error::{ParseErrorKind, ParseResult};
use crate::node::NodeId;
use crate::repeat::read_repeat;
use crate::tree::Tree;
use tracing::{debug, instrument};

/// A group opened by `(` and not yet closed
struct OpenGroup {
    node: NodeId,
    /// Insertion context to restore on `)`
    context: NodeId,
    /// Offset of the `(`
    pos: usize,
}

/// Parser for abbreviations
pub struct Parser<'src> {
    cursor: Cursor<'src>,
    tree: Tree,
    context: NodeId,
    groups: Vec<OpenGroup>,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `source` with surrounding whitespace trimmed
    pub fn new(source: &'src str) -> Self {
        let tree = Tree::new();
        let context = tree.root();
        Self {
            cursor: Cursor::new(source.trim()),
            tree,
            context,
            groups: Vec::new(),
        }
    }

    /// Parse the whole abbreviation into a tree whose root children are the
    /// top-level nodes
    pub fn parse(mut self) -> ParseResult<Tree> {
        while let Some(ch) = self.cursor.peek() {
            match ch {
                '(' => self.open_group(),
                ')' => self.close_group()?,
                _ => self.parse_element()?,
            }
        }

        // report the outermost group that was never closed
        if let Some(group) = self.groups.first() {
            return Err(self.cursor.error_at(ParseErrorKind::UnclosedGroup, group.pos));
        }

        Ok(self.tree)
    }

    fn open_group(&mut self) {
        // The group node stays detached until it is closed, so `^` inside
        // the group cannot climb out of it
        let node = self.tree.create_node();
        let pos = self.cursor.pos();
        self.groups.push(OpenGroup {
            node,
            context: self.context,
            pos,
        });
        self.context = node;
        self.cursor.advance();
        debug!(pos, depth = self.groups.len(), "group opened");
    }

    fn close_group(&mut self) -> ParseResult<()> {
        let Some(group) = self.groups.pop() else {
            return Err(self.cursor.error(ParseErrorKind::UnmatchedGroupClose));
        };

        self.context = group.context;
        self.cursor.advance();

        match read_repeat(&mut self.cursor) {
            Some(repeat) => {
                // repeated groups survive so the expander can copy their
                // children
                self.tree[group.node].set_repeat(Some(repeat));
                self.tree.append_child(self.context, group.node);
            }
            None => {
                while let Some(child) = self.tree.first_child(group.node) {
                    self.tree.append_child(self.context, child);
                }
            }
        }

        // groups can be joined to what follows with an optional `+`
        self.cursor.eat('+');
        debug!(pos = group.pos, depth = self.groups.len(), "group closed");
        Ok(())
    }

    fn parse_element(&mut self) -> ParseResult<()> {
        let node = read_element(&mut self.cursor)?;
        let node = self.tree.push(node);
        self.tree.append_child(self.context, node);

        match self.cursor.peek() {
            Some('+') => {
                self.cursor.advance();
            }
            Some('>') => {
                self.cursor.advance();
                self.context = node;
            }
            Some('^') => {
                // any number of `^` is fine; climbing stops at the top
                while self.cursor.eat('^') {
                    if let Some(parent) = self.tree.parent(self.context) {
                        self.context = parent;
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Parses an abbreviation into a tree
#[instrument(level = "debug", fields(len = source.len()))]
pub fn parse(source: &str) -> ParseResult<Tree> {
    let tree = Parser::new(source).parse()?;
    debug!(
        nodes = tree.descendants(tree.root()).count(),
        "abbreviation parsed"
    );
    Ok(tree)
}
