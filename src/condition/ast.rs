//! Grouped read-only view of a frozen logic tree

use std::fmt;

use crate::condition::comparison::Comparison;
use crate::condition::tree::{Logic, LogicTree, NodeId, NodeKind};

/// AST node for a compiled expression, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    /// Single comparison like ">5"
    Single(Comparison),
    /// AND over two or more operands
    And(Vec<AstNode>),
    /// OR over two or more operands
    Or(Vec<AstNode>),
}

impl AstNode {
    fn is_group(&self) -> bool {
        !matches!(self, AstNode::Single(_))
    }

    /// Evaluate the view directly. Agrees with [`LogicTree::evaluate`].
    pub fn check(&self, value: i32) -> bool {
        match self {
            AstNode::Single(cmp) => cmp.test(value),
            AstNode::And(items) => items.iter().all(|item| item.check(value)),
            AstNode::Or(items) => items.iter().any(|item| item.check(value)),
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (items, logic) = match self {
            AstNode::Single(cmp) => return write!(f, "{}", cmp),
            AstNode::And(items) => (items, Logic::And),
            AstNode::Or(items) => (items, Logic::Or),
        };

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", logic.keyword())?;
            }
            if item.is_group() {
                write!(f, "({})", item)?;
            } else {
                write!(f, "{}", item)?;
            }
        }
        Ok(())
    }
}

/// Deepest fork nesting rendered by [`LogicTree::to_ast`]
pub const VIEW_DEPTH_LIMIT: usize = 256;

/// Marker for a tree nested beyond [`VIEW_DEPTH_LIMIT`]
struct TooDeep;

impl LogicTree {
    /// Grouped view of the tree.
    ///
    /// `None` when no comparison was compiled, or when forks nest deeper than
    /// [`VIEW_DEPTH_LIMIT`]. Evaluation itself has no depth limit.
    pub fn to_ast(&self) -> Option<AstNode> {
        self.chain_ast(self.entry(), 0).ok().flatten()
    }

    fn chain_ast(&self, root: NodeId, depth: usize) -> Result<Option<AstNode>, TooDeep> {
        if depth > VIEW_DEPTH_LIMIT {
            return Err(TooDeep);
        }
        let Some(logic) = self.chain_logic(root) else {
            return Ok(None);
        };

        let members = self
            .chain(root)
            .map(|(_, node)| match *node.kind() {
                NodeKind::Leaf(cmp) => Ok(Some(AstNode::Single(cmp))),
                NodeKind::Fork { target } => self.chain_ast(target, depth + 1),
                NodeKind::Root { .. } => Ok(None),
            })
            .collect::<Result<Vec<_>, TooDeep>>()?;
        let mut items: Vec<AstNode> = members.into_iter().flatten().collect();

        Ok(match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(match logic {
                Logic::Or => AstNode::Or(items),
                Logic::And => AstNode::And(items),
            }),
        })
    }
}
