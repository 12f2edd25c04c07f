//! Arena-backed abbreviation tree
//!
//! Nodes live in a single `Vec` and refer to each other by `NodeId`. The
//! ordered child sequence of a node is its `first_child -> next` chain, so
//! the sequence and the sibling links are one structure and cannot disagree.
//! Detached nodes stay allocated but are unreachable from the root.

use crate::node::{Links, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::ops::{ControlFlow, Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the synthetic root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates a detached node
    pub fn push(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.links = Links::default();
        self.nodes.push(node);
        id
    }

    /// Allocates a detached, empty node
    pub fn create_node(&mut self) -> NodeId {
        self.push(Node::new())
    }

    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.push(Node::with_name(name))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).links.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).links.first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).links.last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).links.next
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).links.previous
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// Pre-order traversal below `id`, yielding `(node, depth)` with the
    /// children of `id` at depth 0
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            top: id,
            next: self.first_child(id).map(|child| (child, 0)),
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it from
    /// wherever it was first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);

        let last = self.last_child(parent);
        {
            let links = &mut self.node_mut(child).links;
            links.parent = Some(parent);
            links.previous = last;
        }

        match last {
            Some(last) => self.node_mut(last).links.next = Some(child),
            None => self.node_mut(parent).links.first_child = Some(child),
        }
        self.node_mut(parent).links.last_child = Some(child);
    }

    /// Inserts `node` right before `reference` in the reference's parent.
    /// Does nothing when `reference` is detached; `node` then stays where it
    /// was.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) {
        if node == reference {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.remove(node);

        let previous = self.previous_sibling(reference);

        {
            let links = &mut self.node_mut(node).links;
            links.parent = Some(parent);
            links.previous = previous;
            links.next = Some(reference);
        }
        self.node_mut(reference).links.previous = Some(node);

        match previous {
            Some(previous) => self.node_mut(previous).links.next = Some(node),
            None => self.node_mut(parent).links.first_child = Some(node),
        }
    }

    /// Detaches `id` (with its subtree) from its parent. Removing a detached
    /// node is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        let links = self.node(id).links.clone();
        let Some(parent) = links.parent else {
            return;
        };

        match links.previous {
            Some(previous) => self.node_mut(previous).links.next = links.next,
            None => self.node_mut(parent).links.first_child = links.next,
        }
        match links.next {
            Some(next) => self.node_mut(next).links.previous = links.previous,
            None => self.node_mut(parent).links.last_child = links.previous,
        }

        let links = &mut self.node_mut(id).links;
        links.parent = None;
        links.previous = None;
        links.next = None;
    }

    /// Replaces `id` with its children in its parent's child sequence and
    /// returns the moved children in order. A detached node just loses its
    /// children.
    pub fn splice(&mut self, id: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.children(id).collect();
        let attached = self.parent(id).is_some();

        for &child in &children {
            if attached {
                self.insert_before(child, id);
            } else {
                self.remove(child);
            }
        }
        self.remove(id);

        children
    }

    /// Copies a node into a new detached node. A deep clone copies the whole
    /// subtree, repeat markers included.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> NodeId {
        let copy = self.node(id).detached_copy();
        let clone = self.push(copy);
        if !deep {
            return clone;
        }

        // (source, copy) pairs whose children are still to be copied
        let mut pending = vec![(id, clone)];
        while let Some((source, target)) = pending.pop() {
            let children: Vec<NodeId> = self.children(source).collect();
            for child in children {
                let copy = self.node(child).detached_copy();
                let child_clone = self.push(copy);
                self.append_child(target, child_clone);
                pending.push((child, child_clone));
            }
        }

        clone
    }

    /// Depth-first walk below `id` with mutable access to the tree.
    ///
    /// The visitor gets the tree, the node and its depth (children of `id`
    /// are at depth 0) and returns `ControlFlow::Break` to stop. The next
    /// sibling is read before the visitor runs, so a visitor may detach the
    /// node it is given and the walk still continues with the sibling that
    /// followed it. The visited node's children are walked right after it.
    pub fn walk<F>(&mut self, id: NodeId, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&mut Tree, NodeId, usize) -> ControlFlow<()>,
    {
        // each entry is the next sibling to visit at a depth
        let mut stack = vec![(self.first_child(id), 0)];
        while let Some((current, depth)) = stack.pop() {
            let Some(node) = current else {
                continue;
            };
            let next = self.next_sibling(node);
            visitor(self, node, depth)?;
            stack.push((next, depth));
            stack.push((self.first_child(node), depth + 1));
        }
        ControlFlow::Continue(())
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_mut(id)
    }
}

pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    top: NodeId,
    next: Option<(NodeId, usize)>,
}

impl Iterator for Descendants<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<(NodeId, usize)> {
        let (current, depth) = self.next?;

        self.next = match self.tree.first_child(current) {
            Some(child) => Some((child, depth + 1)),
            None => {
                // climb until a node with a following sibling, stopping at the top
                let mut node = current;
                let mut depth = depth;
                loop {
                    if let Some(next) = self.tree.next_sibling(node) {
                        break Some((next, depth));
                    }
                    match self.tree.parent(node) {
                        Some(parent) if parent != self.top && depth > 0 => {
                            node = parent;
                            depth -= 1;
                        }
                        _ => break None,
                    }
                }
            }
        };

        Some((current, depth))
    }
}
