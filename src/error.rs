//! Error types for the expression parser

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised while compiling an expression string.
///
/// Every positional variant carries the character offset (from the start of
/// the input) of the first offending character.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("Cannot parse an empty statement string.")]
    EmptyStatement,

    #[error("Logic has already been parsed successfully. Call 'reset' before trying again.")]
    AlreadyConstructed,

    #[error("An invalid character was found at {0}.")]
    ParsingInvalidCharacter(usize),

    #[error("Found a closing brace without an open brace at {0}.")]
    ClosingUnopenedBrace(usize),

    #[error("An invalid expression was found at {0}.")]
    InvalidExpression(usize),

    #[error("Invalid logic found at {0}. Only supports and/&& + or/||.")]
    InvalidLogic(usize),

    #[error("Found {count} unclosed brace(s) at end of statement ({offset}).")]
    UnclosedBrace { count: usize, offset: usize },
}

impl ParseError {
    /// Character offset of the failure (0 for whole-input failures)
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::EmptyStatement | ParseError::AlreadyConstructed => 0,
            ParseError::ParsingInvalidCharacter(at)
            | ParseError::ClosingUnopenedBrace(at)
            | ParseError::InvalidExpression(at)
            | ParseError::InvalidLogic(at) => at,
            ParseError::UnclosedBrace { offset, .. } => offset,
        }
    }

    /// Result code of this failure
    pub fn result(&self) -> ParseResult {
        match self {
            ParseError::EmptyStatement => ParseResult::EmptyStatement,
            ParseError::AlreadyConstructed => ParseResult::AlreadyConstructed,
            ParseError::ParsingInvalidCharacter(_) => ParseResult::ParsingInvalidCharacter,
            ParseError::ClosingUnopenedBrace(_) => ParseResult::ClosingUnopenedBrace,
            ParseError::InvalidExpression(_) => ParseResult::InvalidExpression,
            ParseError::InvalidLogic(_) => ParseResult::InvalidLogic,
            ParseError::UnclosedBrace { .. } => ParseResult::UnclosedBrace,
        }
    }
}

/// Outcome code of the last parse attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParseResult {
    #[default]
    Ok,
    AlreadyConstructed,
    EmptyStatement,
    ParsingInvalidCharacter,
    ClosingUnopenedBrace,
    InvalidExpression,
    InvalidLogic,
    UnclosedBrace,
}

impl ParseResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseResult::Ok => "OK",
            ParseResult::AlreadyConstructed => "AlreadyConstructed",
            ParseResult::EmptyStatement => "EmptyStatement",
            ParseResult::ParsingInvalidCharacter => "ParsingInvalidCharacter",
            ParseResult::ClosingUnopenedBrace => "ClosingUnopenedBrace",
            ParseResult::InvalidExpression => "InvalidExpression",
            ParseResult::InvalidLogic => "InvalidLogic",
            ParseResult::UnclosedBrace => "UnclosedBrace",
        }
    }
}

#[cfg(feature = "python")]
impl From<ParseError> for pyo3::PyErr {
    fn from(err: ParseError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};
        match err {
            ParseError::AlreadyConstructed => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for the expression parser
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_offset() {
        assert_eq!(
            ParseError::ClosingUnopenedBrace(2).to_string(),
            "Found a closing brace without an open brace at 2."
        );
        assert_eq!(
            ParseError::InvalidLogic(4).to_string(),
            "Invalid logic found at 4. Only supports and/&& + or/||."
        );
        assert_eq!(
            ParseError::EmptyStatement.to_string(),
            "Cannot parse an empty statement string."
        );
    }

    #[test]
    fn test_offset_and_result() {
        let err = ParseError::UnclosedBrace { count: 2, offset: 5 };
        assert_eq!(err.offset(), 5);
        assert_eq!(err.result(), ParseResult::UnclosedBrace);
        assert_eq!(ParseError::AlreadyConstructed.offset(), 0);
        assert_eq!(ParseError::InvalidExpression(7).result().as_str(), "InvalidExpression");
    }

    #[test]
    fn test_result_serializes_as_name() {
        let json = serde_json::to_string(&ParseResult::ClosingUnopenedBrace).unwrap();
        assert_eq!(json, "\"ClosingUnopenedBrace\"");
        let back: ParseResult = serde_json::from_str("\"Ok\"").unwrap();
        assert_eq!(back, ParseResult::Ok);
    }
}
