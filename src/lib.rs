//! Expression Parser Core - compile integer conditions into reusable logic trees
//!
//! Expressions such as `">10 and (<50 or >100)"` are compiled once into a
//! frozen [`LogicTree`] and then evaluated cheaply against any `i32`. AND
//! binds tighter than OR; parentheses override.
//!
//! ```
//! use expression_parser_core::ExpressionParser;
//!
//! let mut parser = ExpressionParser::new();
//! parser.parse(">10 and <50 or >100").unwrap();
//! assert!(parser.evaluate(200));
//! assert!(!parser.evaluate(5));
//! ```
//!
//! Python bindings are available behind the `python` feature.

pub mod condition;
pub mod config;
pub mod error;
pub mod parser;

#[cfg(feature = "python")]
mod python;

pub use condition::{AstNode, Comparison, Logic, LogicTree, Operator};
pub use config::ParserConfig;
pub use error::{ParseError, ParseResult, Result};
pub use parser::ExpressionParser;

#[cfg(feature = "python")]
use pyo3::prelude::*;

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn expression_parser_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyExpressionParser>()?;
    m.add_function(wrap_pyfunction!(python::evaluate_expression, m)?)?;
    Ok(())
}
