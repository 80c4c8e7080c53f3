//! Expression parser lifecycle
//!
//! An [`ExpressionParser`] is parsed once, then evaluated any number of
//! times. A second parse is refused until [`ExpressionParser::reset`].

use std::sync::Arc;

use crate::condition::{build_tree, LogicTree};
use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult, Result};

/// Lifecycle of a parser. The building phase lives only inside `parse`.
#[derive(Debug, Clone, Default)]
enum ParserState {
    #[default]
    Empty,
    Parsed(Arc<LogicTree>),
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    config: ParserConfig,
    state: ParserState,
    last_error: Option<ParseError>,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Compile `text` into a logic tree.
    ///
    /// Fails with `AlreadyConstructed`, leaving the current tree untouched,
    /// if a previous parse succeeded. Any other failure leaves the parser
    /// empty and ready for another attempt.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        if let ParserState::Parsed(_) = self.state {
            return Err(self.record(ParseError::AlreadyConstructed));
        }

        tracing::debug!(expression = text, "parsing expression");
        match build_tree(text, &self.config) {
            Ok(tree) => {
                tracing::debug!(nodes = tree.len(), scopes = tree.scope_count(), "expression parsed");
                self.state = ParserState::Parsed(Arc::new(tree));
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "expression rejected");
                self.state = ParserState::Failed;
                Err(self.record(err))
            }
        }
    }

    fn record(&mut self, err: ParseError) -> ParseError {
        self.last_error = Some(err);
        err
    }

    /// Evaluate the parsed tree; false when nothing has been parsed
    pub fn evaluate(&self, value: i32) -> bool {
        match &self.state {
            ParserState::Parsed(tree) => tree.evaluate(value),
            ParserState::Empty | ParserState::Failed => false,
        }
    }

    pub fn evaluate_many(&self, values: &[i32]) -> Vec<bool> {
        match &self.state {
            ParserState::Parsed(tree) => tree.evaluate_many(values),
            ParserState::Empty | ParserState::Failed => vec![false; values.len()],
        }
    }

    /// Discard any tree and return to the empty, parseable state
    pub fn reset(&mut self) {
        self.state = ParserState::Empty;
        self.last_error = None;
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self.state, ParserState::Parsed(_))
    }

    /// Shared handle to the frozen tree, for concurrent evaluation
    pub fn tree(&self) -> Option<Arc<LogicTree>> {
        match &self.state {
            ParserState::Parsed(tree) => Some(Arc::clone(tree)),
            ParserState::Empty | ParserState::Failed => None,
        }
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    pub fn result_code(&self) -> ParseResult {
        self.last_error.map_or(ParseResult::Ok, |err| err.result())
    }

    pub fn error_location(&self) -> usize {
        self.last_error.map_or(0, |err| err.offset())
    }

    pub fn error_message(&self) -> String {
        self.last_error.map(|err| err.to_string()).unwrap_or_default()
    }

    /// Grouped rendering of the parsed tree; `None` before a successful parse
    /// or when brackets nest past the view limit
    pub fn describe(&self) -> Option<String> {
        match &self.state {
            ParserState::Parsed(tree) => tree.to_ast().map(|ast| ast.to_string()),
            ParserState::Empty | ParserState::Failed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_evaluate() {
        let mut parser = ExpressionParser::new();
        parser.parse(">10 and <50 or >100").unwrap();
        assert!(parser.is_parsed());
        assert!(parser.evaluate(200));
        assert!(!parser.evaluate(5));
        assert_eq!(parser.result_code(), ParseResult::Ok);
        assert_eq!(parser.error_message(), "");
    }

    #[test]
    fn test_unparsed_evaluates_false() {
        let parser = ExpressionParser::new();
        assert!(!parser.evaluate(0));
        assert!(!parser.evaluate(i32::MAX));
        assert_eq!(parser.evaluate_many(&[1, 2]), vec![false, false]);
        assert!(parser.tree().is_none());
    }

    #[test]
    fn test_reuse_guard_keeps_first_tree() {
        let mut parser = ExpressionParser::new();
        parser.parse(">5").unwrap();

        let err = parser.parse("<5").unwrap_err();
        assert_eq!(err, ParseError::AlreadyConstructed);
        assert_eq!(parser.result_code(), ParseResult::AlreadyConstructed);
        assert!(parser.is_parsed());
        assert!(parser.evaluate(6));
        assert!(!parser.evaluate(4));
    }

    #[test]
    fn test_reset_allows_reparse() {
        let mut parser = ExpressionParser::new();
        parser.parse(">5").unwrap();
        parser.reset();
        assert!(!parser.is_parsed());
        assert!(!parser.evaluate(6));

        parser.parse("<5").unwrap();
        assert!(parser.evaluate(4));
    }

    #[test]
    fn test_failure_discards_tree_and_reports_location() {
        let mut parser = ExpressionParser::new();
        let err = parser.parse(">5)").unwrap_err();
        assert_eq!(err, ParseError::ClosingUnopenedBrace(2));
        assert_eq!(parser.error_location(), 2);
        assert_eq!(parser.result_code(), ParseResult::ClosingUnopenedBrace);
        assert_eq!(
            parser.error_message(),
            "Found a closing brace without an open brace at 2."
        );
        assert!(!parser.is_parsed());
        assert!(!parser.evaluate(10));

        // a failed parser accepts another attempt without reset
        parser.parse(">5").unwrap();
        assert!(parser.evaluate(10));
        assert_eq!(parser.error_location(), 0);
    }

    #[test]
    fn test_error_kinds() {
        let cases = [
            ("", ParseResult::EmptyStatement),
            ("5<10", ParseResult::InvalidExpression),
            ("<abc", ParseResult::InvalidExpression),
            (">5 xor <1", ParseResult::InvalidLogic),
            ("(>5)x", ParseResult::ParsingInvalidCharacter),
            (">5))", ParseResult::ClosingUnopenedBrace),
        ];

        for (input, expected) in cases {
            let mut parser = ExpressionParser::new();
            let err = parser.parse(input).unwrap_err();
            assert_eq!(err.result(), expected, "Failed for: {:?}", input);
            assert!(!parser.is_parsed());
        }
    }

    #[test]
    fn test_strict_config() {
        let mut parser = ExpressionParser::with_config(ParserConfig::strict());
        let err = parser.parse("(>1 and <9").unwrap_err();
        assert_eq!(err, ParseError::UnclosedBrace { count: 1, offset: 10 });

        let mut lenient = ExpressionParser::new();
        lenient.parse("(>1 and <9").unwrap();
        assert!(lenient.evaluate(5));
    }

    #[test]
    fn test_tree_is_shareable_across_threads() {
        let mut parser = ExpressionParser::new();
        parser.parse("<0 or >100").unwrap();
        let tree = parser.tree().unwrap();

        let handles: Vec<_> = [-50, 50, 100, 150]
            .into_iter()
            .map(|value| {
                let tree = Arc::clone(&tree);
                std::thread::spawn(move || tree.evaluate(value))
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![true, false, false, true]);
    }

    #[test]
    fn test_describe() {
        let mut parser = ExpressionParser::new();
        assert_eq!(parser.describe(), None);
        parser.parse(">10 and (<50 or >100)").unwrap();
        assert_eq!(parser.describe().as_deref(), Some(">10 and (>100 or <50)"));
    }
}
