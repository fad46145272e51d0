//! Lexical scanner for the bracketed grammar notation.
//!
//! The scanner splits source text into identifiers, numbers, quoted strings and
//! punctuation. Whitespace and C-style comments separate tokens and are dropped.
//! A quoted string missing its closing quote runs to the end of the line and is
//! still returned as a token.

use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?s)(?P<skip>\s+|//[^\n]*|/\*.*?\*/)"#,
        r#"|(?P<string>"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`[^`]*`)"#,
        r#"|(?P<open>"(?:[^"\\\n]|\\.)*|'(?:[^'\\\n]|\\.)*|`[^`]*)"#,
        r#"|(?P<arrow>->)"#,
        r#"|(?P<ident>[\p{L}_][\p{L}\p{N}_]*)"#,
        r#"|(?P<number>[0-9]+(?:\.[0-9]+)?)"#,
        r#"|(?P<other>.)"#,
    ))
    .unwrap()
});

/// A 1-based line and column in the grammar source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    fn start() -> Self {
        Position { line: 1, column: 1 }
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token together with where it starts in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub position: Position,
}

/// Splits grammar text into tokens
pub struct Lexer<'a> {
    matches: CaptureMatches<'static, 'a>,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            matches: TOKEN_REGEX.captures_iter(source),
            position: Position::start(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.matches.next()?;
            let text = caps.get(0)?.as_str();
            let position = self.position;
            self.position.advance(text);

            if caps.name("skip").is_some() {
                continue;
            }
            if caps.name("open").is_some() {
                log::debug!("literal not terminated at {}", position);
            }

            log::trace!("token {:?} at {}", text, position);
            return Some(Token { text, position });
        }
    }
}
