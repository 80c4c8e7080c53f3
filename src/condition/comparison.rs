//! Single comparison compiler
//!
//! A comparison token is a 1-2 character operator immediately followed by a
//! signed integer literal, e.g. `<5`, `>=100` or `!=-3`.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,
    /// Equal (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Greater than (>)
    Greater,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Less,
        Operator::LessEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterEqual,
        Operator::Greater,
    ];

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Operator::Less),
            "<=" => Some(Operator::LessEqual),
            "=" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            ">=" => Some(Operator::GreaterEqual),
            ">" => Some(Operator::Greater),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterEqual => ">=",
            Operator::Greater => ">",
        }
    }

    /// Apply the operator with `value` on the left-hand side
    #[inline]
    pub fn apply(&self, value: i32, operand: i32) -> bool {
        match self {
            Operator::Less => value < operand,
            Operator::LessEqual => value <= operand,
            Operator::Equal => value == operand,
            Operator::NotEqual => value != operand,
            Operator::GreaterEqual => value >= operand,
            Operator::Greater => value > operand,
        }
    }
}

/// Reason a comparison token was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("no integer operand at offset 1 or 2 in '{0}'")]
    MissingOperand(String),

    #[error("unknown comparison operator '{0}'")]
    UnknownOperator(String),

    #[error("invalid integer operand: {0}")]
    InvalidOperand(#[from] ParseIntError),
}

/// Immutable compiled comparison against a single integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comparison {
    operator: Operator,
    operand: i32,
}

impl Comparison {
    pub fn new(operator: Operator, operand: i32) -> Self {
        Self { operator, operand }
    }

    /// Compile one condition token (bracket runs already stripped)
    pub fn compile(token: &str) -> Result<Self, CompileError> {
        let split = operand_start(token)
            .filter(|&at| at == 1 || at == 2)
            .ok_or_else(|| CompileError::MissingOperand(token.to_string()))?;

        let (symbol, literal) = token.split_at(split);
        let operator = Operator::from_symbol(symbol)
            .ok_or_else(|| CompileError::UnknownOperator(symbol.to_string()))?;
        let operand = literal.parse::<i32>()?;

        Ok(Self { operator, operand })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> i32 {
        self.operand
    }

    #[inline]
    pub fn test(&self, value: i32) -> bool {
        self.operator.apply(value, self.operand)
    }
}

impl FromStr for Comparison {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::compile(s)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.operand)
    }
}

/// Byte index of the first digit, or of a `-` directly followed by a digit
fn operand_start(token: &str) -> Option<usize> {
    let bytes = token.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let starts_number = b.is_ascii_digit()
            || (b == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit));
        starts_number.then_some(i)
    })
}
