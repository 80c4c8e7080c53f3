//! Parser configuration

use serde::{Deserialize, Serialize};

/// Options controlling how strictly an expression is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Fail with `UnclosedBrace` when input ends inside an open bracket.
    /// Off by default: `"((>5"` is accepted.
    pub reject_unclosed_braces: bool,
}

impl ParserConfig {
    /// Configuration that rejects unclosed brackets
    pub fn strict() -> Self {
        Self {
            reject_unclosed_braces: true,
        }
    }

    /// Load a configuration from a JSON object; missing keys take defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
