//! Balance checker types.

use std::fmt;

use serde::Serialize;

/// An open/close marker pair to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterPair {
    Paren,
    Brace,
    Bracket,
}

impl DelimiterPair {
    pub fn open(self) -> char {
        match self {
            DelimiterPair::Paren => '(',
            DelimiterPair::Brace => '{',
            DelimiterPair::Bracket => '[',
        }
    }

    pub fn close(self) -> char {
        match self {
            DelimiterPair::Paren => ')',
            DelimiterPair::Brace => '}',
            DelimiterPair::Bracket => ']',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DelimiterPair::Paren => "paren",
            DelimiterPair::Brace => "brace",
            DelimiterPair::Bracket => "bracket",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "paren" | "parens" | "()" => Some(DelimiterPair::Paren),
            "brace" | "braces" | "{}" => Some(DelimiterPair::Brace),
            "bracket" | "brackets" | "[]" => Some(DelimiterPair::Bracket),
            _ => None,
        }
    }
}

impl fmt::Display for DelimiterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.open(), self.close())
    }
}

/// Which characters participate in the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceMode {
    /// Every character counts, including string and comment content.
    #[default]
    Raw,
    /// Characters inside strings and comments are skipped.
    Lexical,
}

impl BalanceMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "raw" => Some(BalanceMode::Raw),
            "lexical" => Some(BalanceMode::Lexical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterKind {
    Open,
    Close,
}

/// A delimiter occurrence with its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelimiterEvent {
    pub kind: DelimiterKind,
    pub line: u32,
    pub column: u32,
}

/// A line whose own opens and closes differ by more than the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineImbalance {
    pub line: u32,
    pub opens: u32,
    pub closes: u32,
    /// opens - closes
    pub delta: i64,
    pub snippet: String,
}

/// Result of checking one delimiter pair in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub file: String,
    pub pair: DelimiterPair,
    pub open_count: u32,
    pub close_count: u32,
    /// Opens never closed, in source order
    pub unmatched_opens: Vec<DelimiterEvent>,
    /// Closes with nothing to pop, in source order
    pub unmatched_closes: Vec<DelimiterEvent>,
    pub line_warnings: Vec<LineImbalance>,
}

impl BalanceReport {
    /// open_count - close_count
    pub fn net(&self) -> i64 {
        i64::from(self.open_count) - i64::from(self.close_count)
    }

    pub fn is_balanced(&self) -> bool {
        self.unmatched_opens.is_empty() && self.unmatched_closes.is_empty()
    }
}
