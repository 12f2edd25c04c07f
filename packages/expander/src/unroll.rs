//! Repeat unrolling
//!
//! Every pending `*N` repeat is replaced by `N` deep copies of its node, each
//! stamped with its 1-based copy number. A copy of a repeated group has its
//! own repeats unrolled first, then its children are spliced into the group's
//! place and every one of them takes the group's stamp. Groups never survive.
//!
//! A node budget turns the expansion into a pre-order prefix of the unbounded
//! result: once the budget is spent, every node that would follow is dropped,
//! and a copy whose subtree did not fit is removed whole.
//!
//! The traversal runs on an explicit work stack so nesting depth is bounded
//! by memory rather than by the call stack.

use crate::error::{ExpandError, ExpandResult};
use crate::options::{ExpandOptions, NodeBudget};
use abbrev_parser::{NodeId, Repeat, RepeatCount, Tree};
use serde::Serialize;
use tracing::{debug, instrument, trace};

/// Outcome of an expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expansion {
    /// Concrete nodes left in the tree
    pub nodes: usize,
    /// Whether the node budget cut anything off
    pub truncated: bool,
}

/// Remaining node budget, carried through the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Budget {
    remaining: Option<usize>,
    truncated: bool,
}

impl Budget {
    fn new(budget: NodeBudget) -> Self {
        Self {
            remaining: budget.limit(),
            truncated: false,
        }
    }

    fn is_exhausted(self) -> bool {
        self.remaining == Some(0)
    }

    fn spend(self) -> Self {
        Self {
            remaining: self.remaining.map(|n| n.saturating_sub(1)),
            ..self
        }
    }

    fn truncate(self) -> Self {
        Self {
            truncated: true,
            ..self
        }
    }
}

/// Expands the repeats of parsed trees
#[derive(Debug, Clone, Default)]
pub struct Expander {
    options: ExpandOptions,
}

impl Expander {
    pub fn new(options: ExpandOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Expand `tree` in place. In strict mode the tree is checked for bare
    /// `*` repeats before anything is changed.
    #[instrument(skip(self, tree), fields(limit = ?self.options.limit, strict = self.options.strict))]
    pub fn expand(&self, tree: &mut Tree) -> ExpandResult<Expansion> {
        if self.options.strict {
            check_counts(tree)?;
        }
        Ok(self.run(tree))
    }

    fn run(&self, tree: &mut Tree) -> Expansion {
        let root = tree.root();
        let budget = unroll_children(tree, root, Budget::new(self.options.budget()));

        let nodes = tree
            .descendants(root)
            .filter(|&(id, _)| !tree[id].is_group())
            .count();

        if budget.truncated {
            debug!(nodes, "expansion truncated by node budget");
        }
        debug!(nodes, "expansion complete");

        Expansion {
            nodes,
            truncated: budget.truncated,
        }
    }
}

/// Expand every repeat in `tree`
pub fn unroll(tree: &mut Tree) -> Expansion {
    Expander::default().run(tree)
}

/// Expand `tree` keeping at most `limit` concrete nodes; `0` means no limit
pub fn unroll_limited(tree: &mut Tree, limit: usize) -> Expansion {
    Expander::new(ExpandOptions::new().with_limit(limit)).run(tree)
}

/// Fails on the first pending bare `*` repeat in pre-order
fn check_counts(tree: &Tree) -> ExpandResult<()> {
    let unbounded = tree.descendants(tree.root()).position(|(id, _)| {
        tree[id]
            .pending_repeat()
            .is_some_and(|repeat| repeat.count == RepeatCount::Unbounded)
    });

    match unbounded {
        Some(pos) => Err(ExpandError::UnboundedRepeat { pos }),
        None => Ok(()),
    }
}

/// Pending work of the traversal
enum Frame {
    /// Siblings left to visit, starting at `next`
    Siblings { next: Option<NodeId> },
    /// Copies of `template` left to emit. `current` is the copy whose
    /// subtree is being unrolled.
    Copies {
        template: NodeId,
        repeat: Repeat,
        emitted: usize,
        current: Option<NodeId>,
    },
}

fn unroll_children(tree: &mut Tree, parent: NodeId, mut budget: Budget) -> Budget {
    let mut stack = vec![Frame::Siblings {
        next: tree.first_child(parent),
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Siblings { next: None } => {}
            Frame::Siblings { next: Some(id) } => {
                // copies go in before `id`, so the following sibling is unaffected
                let mut next = tree.next_sibling(id);
                let mut nested = None;

                if budget.is_exhausted() {
                    tree.remove(id);
                    budget = budget.truncate();
                } else if let Some(repeat) = tree[id].pending_repeat() {
                    nested = Some(Frame::Copies {
                        template: id,
                        repeat,
                        emitted: 0,
                        current: None,
                    });
                } else if tree[id].is_group() {
                    if let Some(&first) = tree.splice(id).first() {
                        next = Some(first);
                    }
                } else {
                    budget = budget.spend();
                    nested = Some(Frame::Siblings {
                        next: tree.first_child(id),
                    });
                }

                stack.push(Frame::Siblings { next });
                stack.extend(nested);
            }
            Frame::Copies {
                template,
                repeat,
                emitted,
                current,
            } => {
                if let Some(copy) = current {
                    finish_copy(tree, copy, Repeat::stamped(repeat.count, emitted), budget);
                }

                // a bare `*` emits the node once
                let count = repeat.count.exact().unwrap_or(1);
                if emitted == count || budget.is_exhausted() {
                    if emitted < count {
                        budget = budget.truncate();
                    }
                    tree.remove(template);
                    continue;
                }

                let value = emitted + 1;
                let copy = tree.clone_node(template, true);
                tree[copy].set_repeat(Some(Repeat::stamped(repeat.count, value)));
                tree.insert_before(copy, template);
                trace!(node = template.index(), value, count, "emit copy");

                // a group copy holds its children until they are unrolled
                if !tree[copy].is_group() {
                    budget = budget.spend();
                }

                stack.push(Frame::Copies {
                    template,
                    repeat,
                    emitted: value,
                    current: Some(copy),
                });
                stack.push(Frame::Siblings {
                    next: tree.first_child(copy),
                });
            }
        }
    }

    budget
}

/// Settles a copy once its subtree has been unrolled: a copy the budget cut
/// into is dropped, a group copy hands its children to its parent.
fn finish_copy(tree: &mut Tree, copy: NodeId, stamp: Repeat, budget: Budget) {
    if budget.truncated {
        trace!(node = copy.index(), "drop partial copy");
        tree.remove(copy);
    } else if tree[copy].is_group() {
        for child in tree.splice(copy) {
            tree[child].set_repeat(Some(stamp));
        }
    }
}
