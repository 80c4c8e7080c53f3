//! Logic tree builder
//!
//! Consumes the token stream in a single left-to-right pass. New leaves are
//! inserted at the head of the active chain, bracket forks at its tail, and
//! an `and` pulls the most recent operand down into the scope's AND-chain
//! with one splice, which is what makes AND bind tighter than OR.

use smallvec::SmallVec;

use crate::condition::comparison::Comparison;
use crate::condition::tokenizer::{ConditionToken, Token, Tokenizer};
use crate::condition::tree::{BranchId, Logic, LogicTree, NodeArena, NodeId};
use crate::config::ParserConfig;
use crate::error::{ParseError, Result};

/// Mutable construction state for one parse pass
#[derive(Debug)]
pub struct LogicTreeBuilder {
    arena: NodeArena,
    top: BranchId,
    current_branch: BranchId,
    current_root: NodeId,
    open_forks: SmallVec<[NodeId; 8]>,
    /// Operand most recently completed at the current scope
    last_operand: Option<NodeId>,
}

impl Default for LogicTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicTreeBuilder {
    pub fn new() -> Self {
        let mut arena = NodeArena::new();
        let top = arena.new_branch();
        let current_root = arena.branch(top).or_root;
        Self {
            arena,
            top,
            current_branch: top,
            current_root,
            open_forks: SmallVec::new(),
            last_operand: None,
        }
    }

    /// Logic kind of the chain currently receiving operands
    pub fn current_logic(&self) -> Logic {
        self.arena
            .root_info(self.current_root)
            .map_or(Logic::Or, |(logic, _)| logic)
    }

    /// Number of brackets opened and not yet closed
    pub fn open_depth(&self) -> usize {
        self.open_forks.len()
    }

    /// Compile `condition` and insert it at the head of the active chain
    pub fn add_expression(&mut self, condition: &str, offset: usize) -> Result<NodeId> {
        let comparison =
            Comparison::compile(condition).map_err(|_| ParseError::InvalidExpression(offset))?;
        let leaf = self.arena.new_leaf(comparison);
        self.arena.splice(self.current_root, leaf);
        self.last_operand = Some(leaf);
        Ok(leaf)
    }

    /// Open a nested scope, forking into it from the tail of the active chain
    pub fn open_brace(&mut self) {
        let branch = self.arena.new_branch();
        let or_root = self.arena.branch(branch).or_root;
        let fork = self.arena.new_fork(or_root);
        self.open_forks.push(fork);

        let tail = self.arena.chain_last(self.current_root);
        self.arena.splice(tail, fork);

        self.current_branch = branch;
        self.current_root = or_root;
        self.last_operand = None;
        tracing::trace!(depth = self.open_forks.len(), "opened scope");
    }

    /// Close the innermost scope, returning to the chain holding its fork
    pub fn close_brace(&mut self, offset: usize) -> Result<()> {
        let fork = self
            .open_forks
            .pop()
            .ok_or(ParseError::ClosingUnopenedBrace(offset))?;

        let root = self.arena.chain_root(fork);
        let (_, branch) = self
            .arena
            .root_info(root)
            .ok_or(ParseError::ClosingUnopenedBrace(offset))?;

        self.current_root = root;
        self.current_branch = branch;
        self.last_operand = Some(fork);
        tracing::trace!(depth = self.open_forks.len(), "closed scope");
        Ok(())
    }

    /// Switch the active chain for the next operand
    pub fn apply_logic(&mut self, logic: Logic) {
        if logic == self.current_logic() {
            return;
        }

        match logic {
            Logic::Or => {
                // The AND group stays where its fork already sits
                self.current_root = self.arena.branch(self.current_branch).or_root;
            }
            Logic::And => {
                let and_root = self.fresh_and_root();
                if let Some(operand) = self.last_operand {
                    self.arena.splice(and_root, operand);
                    tracing::trace!(node = operand.index(), "moved operand into AND group");
                }
                self.current_root = and_root;
            }
        }
    }

    /// AND-chain for a new conjunction at the current scope.
    ///
    /// The scope's own AND-chain is reused while empty; once a group has been
    /// closed by `or`, a new chain is created and forked from the OR-chain.
    fn fresh_and_root(&mut self) -> NodeId {
        let branch = *self.arena.branch(self.current_branch);
        if self.arena.is_chain_empty(branch.and_root) {
            return branch.and_root;
        }

        let and_root = self.arena.new_root(Logic::And, self.current_branch);
        let fork = self.arena.new_fork(and_root);
        let tail = self.arena.chain_last(branch.or_root);
        self.arena.splice(tail, fork);
        self.arena.branch_mut(self.current_branch).and_root = and_root;
        and_root
    }

    fn push_condition(&mut self, token: &ConditionToken<'_>) -> Result<()> {
        for _ in 0..token.opens {
            self.open_brace();
        }

        self.add_expression(token.core, token.core_offset())?;

        for index in 0..token.closes {
            self.close_brace(token.close_offset(index))?;
        }
        Ok(())
    }

    /// Seal the tree. Unclosed scopes are an error only when `strict`.
    pub fn finish(self, strict: bool, end_offset: usize) -> Result<LogicTree> {
        if strict && !self.open_forks.is_empty() {
            return Err(ParseError::UnclosedBrace {
                count: self.open_forks.len(),
                offset: end_offset,
            });
        }
        let entry = self.arena.branch(self.top).or_root;
        Ok(self.arena.freeze(entry))
    }
}

/// Compile an expression string into a frozen logic tree
pub fn build_tree(input: &str, config: &ParserConfig) -> Result<LogicTree> {
    if input.is_empty() {
        return Err(ParseError::EmptyStatement);
    }

    let mut builder = LogicTreeBuilder::new();
    for token in Tokenizer::new(input) {
        match token? {
            Token::Condition(condition) => builder.push_condition(&condition)?,
            Token::Logic { logic, .. } => builder.apply_logic(logic),
        }
    }

    builder.finish(config.reject_unclosed_braces, input.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> String {
        let tree = build_tree(input, &ParserConfig::default()).unwrap();
        tree.to_ast().map(|ast| ast.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_single_leaf() {
        assert_eq!(render(">5"), ">5");
    }

    #[test]
    fn test_leaves_insert_at_chain_head() {
        assert_eq!(render("=1 or =2 or =3"), "=3 or =2 or =1");
        assert_eq!(render("=1 && =2 && =3"), "=3 and =2 and =1");
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(render(">10 and <50 or >100"), ">100 or (<50 and >10)");
        assert_eq!(render("=1 or =2 and =3"), "=1 or (=3 and =2)");
    }

    #[test]
    fn test_separate_and_groups() {
        assert_eq!(
            render("=1 and =2 or =3 and =4"),
            "(=2 and =1) or (=4 and =3)"
        );
    }

    #[test]
    fn test_brackets_override_precedence() {
        assert_eq!(render(">10 and (<50 or >100)"), ">10 and (>100 or <50)");
        assert_eq!(render("(=1 or =2) and =3"), "=3 and (=2 or =1)");
    }

    #[test]
    fn test_bracket_fork_appended_at_tail() {
        assert_eq!(render("=1 or (=2 and =3) or =4"), "=4 or =1 or (=3 and =2)");
    }

    #[test]
    fn test_nested_brackets() {
        assert_eq!(render("((=1 or =2) and =3)"), "=3 and (=2 or =1)");
    }

    #[test]
    fn test_unclosed_brace_is_permissive_by_default() {
        assert_eq!(render("((>5"), ">5");
    }

    #[test]
    fn test_unclosed_brace_rejected_when_strict() {
        let config = ParserConfig {
            reject_unclosed_braces: true,
        };
        let err = build_tree("((>5", &config).unwrap_err();
        assert_eq!(err, ParseError::UnclosedBrace { count: 2, offset: 4 });
        assert!(build_tree("(>5)", &config).is_ok());
    }

    #[test]
    fn test_closing_unopened_brace_offset() {
        let err = build_tree(">5)", &ParserConfig::default()).unwrap_err();
        assert_eq!(err, ParseError::ClosingUnopenedBrace(2));

        let err = build_tree("(>5)) or <1", &ParserConfig::default()).unwrap_err();
        assert_eq!(err, ParseError::ClosingUnopenedBrace(4));
    }

    #[test]
    fn test_invalid_expression_offsets() {
        let config = ParserConfig::default();
        assert_eq!(
            build_tree("5<10", &config).unwrap_err(),
            ParseError::InvalidExpression(0)
        );
        assert_eq!(
            build_tree("<abc", &config).unwrap_err(),
            ParseError::InvalidExpression(0)
        );
        assert_eq!(
            build_tree(">1 or ((x", &config).unwrap_err(),
            ParseError::InvalidExpression(8)
        );
    }

    #[test]
    fn test_empty_statement() {
        assert_eq!(
            build_tree("", &ParserConfig::default()).unwrap_err(),
            ParseError::EmptyStatement
        );
    }

    #[test]
    fn test_builder_tracks_scope() {
        let mut builder = LogicTreeBuilder::new();
        assert_eq!(builder.current_logic(), Logic::Or);
        builder.open_brace();
        builder.add_expression(">1", 1).unwrap();
        assert_eq!(builder.open_depth(), 1);
        builder.apply_logic(Logic::And);
        assert_eq!(builder.current_logic(), Logic::And);
        builder.close_brace(3).unwrap();
        assert_eq!(builder.open_depth(), 0);
        assert_eq!(builder.current_logic(), Logic::Or);
        assert_eq!(
            builder.close_brace(4).unwrap_err(),
            ParseError::ClosingUnopenedBrace(4)
        );
    }
}
