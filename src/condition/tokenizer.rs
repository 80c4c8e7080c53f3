//! Expression tokenizer and bracket scanning
//!
//! The input is split on single spaces into tokens that alternate between
//! condition and logic position, starting with a condition. Condition tokens
//! have their leading `(` run and trailing `)` run peeled off.

use std::str::Split;

use crate::condition::tree::Logic;
use crate::error::{ParseError, Result};

/// A condition-position token with its bracket runs separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionToken<'a> {
    /// Number of leading `(`
    pub opens: usize,
    /// Comparison text between the bracket runs
    pub core: &'a str,
    /// Number of trailing `)`
    pub closes: usize,
    /// Character offset of the token start
    pub offset: usize,
}

impl ConditionToken<'_> {
    /// Character offset of the comparison text
    pub fn core_offset(&self) -> usize {
        self.offset + self.opens
    }

    /// Character offset of the `index`-th trailing `)`
    pub fn close_offset(&self, index: usize) -> usize {
        self.core_offset() + self.core.chars().count() + index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Condition(ConditionToken<'a>),
    Logic { logic: Logic, offset: usize },
}

/// Lazy left-to-right token stream; errors surface in input order
pub struct Tokenizer<'a> {
    parts: Split<'a, char>,
    offset: usize,
    end: usize,
    expect_condition: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            parts: input.split(' '),
            offset: 0,
            end: input.chars().count(),
            expect_condition: true,
            finished: false,
        }
    }

    fn next_token(&mut self) -> Option<Result<Token<'a>>> {
        let Some(part) = self.parts.next() else {
            // A dangling logic token leaves a term missing at the end
            return self
                .expect_condition
                .then_some(Err(ParseError::InvalidExpression(self.end)));
        };

        let offset = self.offset;
        self.offset += part.chars().count() + 1;

        let token = if self.expect_condition {
            scan_condition(part, offset).map(Token::Condition)
        } else {
            Logic::from_keyword(part)
                .map(|logic| Token::Logic { logic, offset })
                .ok_or(ParseError::InvalidLogic(offset))
        };
        self.expect_condition = !self.expect_condition;
        Some(token)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_token();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

/// Split a condition token into its bracket runs and comparison text
pub fn scan_condition(part: &str, offset: usize) -> Result<ConditionToken<'_>> {
    let rest = part.trim_start_matches('(');
    let opens = part.len() - rest.len();
    let core = rest.trim_end_matches(')');
    let closes = rest.len() - core.len();

    // Brackets are only legal in the leading and trailing runs
    if let Some(stray) = core.chars().position(|c| c == '(' || c == ')') {
        return Err(ParseError::ParsingInvalidCharacter(offset + opens + stray));
    }

    Ok(ConditionToken {
        opens,
        core,
        closes,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Result<Vec<Token<'_>>> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_alternating_tokens() {
        let toks = tokens(">10 and <50 || =7").unwrap();
        assert_eq!(toks.len(), 5);
        assert_eq!(
            toks[1],
            Token::Logic {
                logic: Logic::And,
                offset: 4
            }
        );
        assert_eq!(
            toks[3],
            Token::Logic {
                logic: Logic::Or,
                offset: 12
            }
        );
        match toks[4] {
            Token::Condition(cond) => {
                assert_eq!(cond.core, "=7");
                assert_eq!(cond.offset, 15);
            }
            _ => panic!("Expected condition token"),
        }
    }

    #[test]
    fn test_bracket_runs() {
        let cond = scan_condition("((>5)", 3).unwrap();
        assert_eq!(cond.opens, 2);
        assert_eq!(cond.core, ">5");
        assert_eq!(cond.closes, 1);
        assert_eq!(cond.core_offset(), 5);
        assert_eq!(cond.close_offset(0), 7);
    }

    #[test]
    fn test_stray_bracket_is_invalid_character() {
        assert_eq!(
            scan_condition("(>5)x", 0),
            Err(ParseError::ParsingInvalidCharacter(3))
        );
        assert_eq!(
            scan_condition(">(5", 10),
            Err(ParseError::ParsingInvalidCharacter(11))
        );
    }

    #[test]
    fn test_input_may_end_after_condition() {
        assert_eq!(tokens(">5").unwrap().len(), 1);
        assert_eq!(tokens("((>5").unwrap().len(), 1);
        assert_eq!(tokens(">5 and <9").unwrap().len(), 3);
    }

    #[test]
    fn test_stray_bracket_before_opening_run() {
        assert_eq!(
            scan_condition("x(>5", 0),
            Err(ParseError::ParsingInvalidCharacter(1))
        );
    }

    #[test]
    fn test_invalid_logic_offset() {
        let err = tokens(">5 xor <3").unwrap_err();
        assert_eq!(err, ParseError::InvalidLogic(3));
    }

    #[test]
    fn test_trailing_logic_is_missing_term() {
        let err = tokens(">5 and").unwrap_err();
        assert_eq!(err, ParseError::InvalidExpression(6));
    }

    #[test]
    fn test_double_space_yields_empty_logic() {
        let err = tokens(">5  and <3").unwrap_err();
        assert_eq!(err, ParseError::InvalidLogic(3));
    }

    #[test]
    fn test_stops_after_first_error() {
        let mut tok = Tokenizer::new(">5 nope <3 and");
        assert!(matches!(tok.next(), Some(Ok(Token::Condition(_)))));
        assert!(matches!(tok.next(), Some(Err(ParseError::InvalidLogic(3)))));
        assert!(tok.next().is_none());
    }
}
