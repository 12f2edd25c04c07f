use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Expansion settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandOptions {
    /// Maximum number of concrete nodes in the result. `None` or `0` means
    /// no limit.
    #[serde(default)]
    pub limit: Option<usize>,

    /// Reject bare `*` repeats instead of emitting the node once
    #[serde(default)]
    pub strict: bool,
}

impl ExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `0` means no limit
    pub fn with_limit(self, limit: usize) -> Self {
        self.with_budget(NodeBudget::from(limit))
    }

    pub fn with_budget(mut self, budget: NodeBudget) -> Self {
        self.limit = budget.limit();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn budget(&self) -> NodeBudget {
        NodeBudget::from(self.limit)
    }
}

/// How many concrete nodes an expansion may produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeBudget {
    #[default]
    Unbounded,
    Limited(NonZeroUsize),
}

impl NodeBudget {
    pub fn limit(self) -> Option<usize> {
        match self {
            NodeBudget::Unbounded => None,
            NodeBudget::Limited(limit) => Some(limit.get()),
        }
    }
}

impl From<usize> for NodeBudget {
    fn from(limit: usize) -> Self {
        NonZeroUsize::new(limit).map_or(NodeBudget::Unbounded, NodeBudget::Limited)
    }
}

impl From<Option<usize>> for NodeBudget {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(NodeBudget::Unbounded, NodeBudget::from)
    }
}

/// Anything that is not a positive integer means no limit
impl FromStr for NodeBudget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeBudget::from(s.trim().parse::<usize>().ok()))
    }
}
