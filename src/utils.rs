use std::io;
use thiserror::Error;

use crate::lexer::Position;

/// Custom error types for grammar parsing
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected '->' or '=' at {0}")]
    ExpectedArrow(Position),

    #[error("expected '|' or ';' at {0}")]
    ExpectedChoiceOrEnd(Position),

    #[error("production rule must be 'LHS = RHS' (line {line})")]
    MalformedRule { line: usize },
}

impl GrammarError {
    /// Source position of the offending token, if the error has one
    pub fn position(&self) -> Option<Position> {
        match self {
            GrammarError::ExpectedArrow(pos) | GrammarError::ExpectedChoiceOrEnd(pos) => {
                Some(*pos)
            }
            GrammarError::MalformedRule { line } => Some(Position {
                line: *line,
                column: 1,
            }),
            GrammarError::Io(_) | GrammarError::Json(_) => None,
        }
    }
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Strip matching quotes from a token.
///
/// Returns the inner text when the token starts and ends with the same quote
/// character (`'` or `"`) and is at least two characters long.
pub fn unquote(token: &str) -> Option<&str> {
    let mut chars = token.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if (first == '\'' || first == '"') && first == last {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}
