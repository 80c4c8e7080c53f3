//! Node arena for the logic tree
//!
//! Every bracket scope is a [`Branch`] owning an OR-chain and an AND-chain.
//! Chains are doubly linked lists of [`Node`] records addressed by
//! [`NodeId`], headed by a `Root` node. The OR-chain of every branch is
//! created holding a `Fork` into its AND-chain, so conjunctions always sit
//! one level below the disjunction that contains them.

use std::ops::{Index, IndexMut};

use crate::condition::comparison::Comparison;

/// Stable index of a node inside its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable index of a bracket scope inside its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(usize);

/// Logic kind of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    Or,
    And,
}

impl Logic {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "or" | "||" => Some(Logic::Or),
            "and" | "&&" => Some(Logic::And),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Logic::Or => "or",
            Logic::And => "and",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Logic::Or => Logic::And,
            Logic::And => Logic::Or,
        }
    }

    /// The sibling result that settles a whole chain of this kind
    #[inline]
    pub fn short_circuits_on(&self) -> bool {
        matches!(self, Logic::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// One comparison test
    Leaf(Comparison),
    /// Entry into another chain
    Fork { target: NodeId },
    /// Sentinel head of a chain
    Root { logic: Logic, branch: BranchId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl Node {
    fn detached(kind: NodeKind) -> Self {
        Self {
            kind,
            prev: None,
            next: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

/// One bracket-nesting scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub or_root: NodeId,
    /// AND-chain currently collecting conjuncts for this scope
    pub and_root: NodeId,
}

/// Mutable node storage used while a tree is being built
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    branches: Vec<Branch>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(kind));
        id
    }

    pub fn new_leaf(&mut self, comparison: Comparison) -> NodeId {
        self.push(NodeKind::Leaf(comparison))
    }

    pub fn new_fork(&mut self, target: NodeId) -> NodeId {
        self.push(NodeKind::Fork { target })
    }

    pub fn new_root(&mut self, logic: Logic, branch: BranchId) -> NodeId {
        self.push(NodeKind::Root { logic, branch })
    }

    /// Create a scope with both chains and the OR -> AND fork in place
    pub fn new_branch(&mut self) -> BranchId {
        let id = BranchId(self.branches.len());
        let or_root = self.new_root(Logic::Or, id);
        let and_root = self.new_root(Logic::And, id);
        let fork = self.new_fork(and_root);
        self.splice(or_root, fork);
        self.branches.push(Branch { or_root, and_root });
        id
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id.0]
    }

    pub fn branch_mut(&mut self, id: BranchId) -> &mut Branch {
        &mut self.branches[id.0]
    }

    pub fn root_of(&self, id: BranchId, logic: Logic) -> NodeId {
        let branch = self.branch(id);
        match logic {
            Logic::Or => branch.or_root,
            Logic::And => branch.and_root,
        }
    }

    /// Logic kind and owning branch of a root node
    pub fn root_info(&self, root: NodeId) -> Option<(Logic, BranchId)> {
        match self[root].kind {
            NodeKind::Root { logic, branch } => Some((logic, branch)),
            _ => None,
        }
    }

    /// Root heading the chain that currently holds `node`
    pub fn chain_root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(prev) = self[current].prev {
            current = prev;
        }
        current
    }

    /// Last node of the chain starting at `node`
    pub fn chain_last(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(next) = self[current].next {
            current = next;
        }
        current
    }

    pub fn is_chain_empty(&self, root: NodeId) -> bool {
        self[root].next.is_none()
    }

    /// Place `node` immediately after `after`.
    ///
    /// `node` may be detached, elsewhere in the same chain, or part of a
    /// different chain; the chain it leaves is closed over the gap.
    pub fn splice(&mut self, after: NodeId, node: NodeId) {
        if after == node || self[after].next == Some(node) {
            return;
        }

        let old_next = self[after].next;
        let (their_prev, their_next) = (self[node].prev, self[node].next);

        if let Some(prev) = their_prev {
            self[prev].next = their_next;
        }
        if let Some(next) = their_next {
            self[next].prev = their_prev;
        }

        self[after].next = Some(node);
        self[node].prev = Some(after);

        self[node].next = old_next;
        if let Some(next) = old_next {
            self[next].prev = Some(node);
        }
    }

    /// Seal the arena into a read-only tree entered at `entry`
    pub fn freeze(self, entry: NodeId) -> LogicTree {
        LogicTree {
            nodes: self.nodes.into_boxed_slice(),
            entry,
            scopes: self.branches.len(),
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

/// Frozen logic tree produced by a successful parse.
///
/// Holds no interior mutability and offers only `&self` access, so it can be
/// shared across threads behind an `Arc` and evaluated concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicTree {
    nodes: Box<[Node]>,
    entry: NodeId,
    scopes: usize,
}

impl LogicTree {
    /// OR-root of the top-level scope
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes, sentinels included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of bracket scopes, the top-level one included
    pub fn scope_count(&self) -> usize {
        self.scopes
    }

    /// Logic kind of the chain headed by `root`
    pub fn chain_logic(&self, root: NodeId) -> Option<Logic> {
        match self.node(root).kind {
            NodeKind::Root { logic, .. } => Some(logic),
            _ => None,
        }
    }

    /// Iterate the members of the chain headed by `root`, in evaluation order
    pub fn chain(&self, root: NodeId) -> ChainIter<'_> {
        ChainIter {
            tree: self,
            next: self.node(root).next,
        }
    }
}

pub struct ChainIter<'a> {
    tree: &'a LogicTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.node(id);
        self.next = node.next;
        Some((id, node))
    }
}
