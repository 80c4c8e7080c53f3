//! Expression compilation and evaluation module
//!
//! This module turns strings like ">10 and (<50 or >100)" into a frozen
//! [`LogicTree`] and evaluates it against integers.

mod ast;
pub mod builder;
mod comparison;
mod evaluator;
pub mod tokenizer;
mod tree;


pub use ast::*;
pub use builder::{build_tree, LogicTreeBuilder};
pub use comparison::*;
pub use evaluator::*;
pub use tree::*;
