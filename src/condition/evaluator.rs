//! Short-circuit evaluation of a frozen logic tree
//!
//! Forks are walked with an explicit stack of suspended chains, so bracket
//! depth never grows the call stack.

use smallvec::SmallVec;

use crate::condition::tree::{Logic, LogicTree, NodeId, NodeKind};

/// A chain suspended at a fork: its logic and the sibling after the fork
type Suspended = (Logic, Option<NodeId>);

impl LogicTree {
    /// Evaluate the tree against `value`
    #[inline]
    pub fn evaluate(&self, value: i32) -> bool {
        self.evaluate_chain(self.entry(), value)
    }

    /// Evaluate each value in order
    pub fn evaluate_many(&self, values: &[i32]) -> Vec<bool> {
        values.iter().map(|&value| self.evaluate(value)).collect()
    }

    /// Evaluate the chain headed by `root`. An empty chain is false, which is
    /// also the neutral result inside the enclosing OR-chain.
    fn evaluate_chain(&self, root: NodeId, value: i32) -> bool {
        let mut suspended: SmallVec<[Suspended; 8]> = SmallVec::new();
        let (mut logic, mut cursor) = self.enter(root);
        let mut result = false;

        loop {
            let Some(id) = cursor else {
                // The current chain settled on `result`; resume its parent
                let Some((parent_logic, after_fork)) = suspended.pop() else {
                    return result;
                };
                logic = parent_logic;
                cursor = if result == logic.short_circuits_on() {
                    None
                } else {
                    after_fork
                };
                continue;
            };

            let node = self.node(id);
            match *node.kind() {
                NodeKind::Leaf(comparison) => {
                    result = comparison.test(value);
                    // OR settles on the first true, AND on the first false
                    cursor = if result == logic.short_circuits_on() {
                        None
                    } else {
                        node.next()
                    };
                }
                NodeKind::Fork { target } => {
                    suspended.push((logic, node.next()));
                    (logic, cursor) = self.enter(target);
                    result = false;
                }
                NodeKind::Root { .. } => {
                    debug_assert!(false, "root node linked inside a chain");
                    result = false;
                    cursor = None;
                }
            }
        }
    }

    /// Logic and first member of the chain headed by `root`
    fn enter(&self, root: NodeId) -> (Logic, Option<NodeId>) {
        match self.chain_logic(root) {
            Some(logic) => (logic, self.node(root).next()),
            None => {
                debug_assert!(false, "chain evaluation must start at a root");
                (Logic::Or, None)
            }
        }
    }
}

/// Evaluate a tree against a value
#[inline]
pub fn check(tree: &LogicTree, value: i32) -> bool {
    tree.evaluate(value)
}
