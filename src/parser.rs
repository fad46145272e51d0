//! Parsers for the two textual grammar notations.
//!
//! The bracketed notation is statement based and may span lines:
//!
//! ```text
//! expr -> term | "(" ;
//! term = 'x' ;
//! ```
//!
//! The line notation holds one rule group per line, with whitespace-separated
//! symbols and no terminator:
//!
//! ```text
//! expr -> term "+" expr | term
//! term = 'x' | 'y'
//! ```

use std::io::{BufRead, BufReader, Read};

use crate::grammar::{Grammar, Production, Symbol};
use crate::lexer::Lexer;
use crate::utils::{GrammarError, Result, unquote};

fn is_arrow(token: &str) -> bool {
    token == "->" || token == "="
}

/// Quoted tokens are terminals with the quotes removed, anything else names a
/// non-terminal verbatim.
fn classify(token: &str) -> Symbol {
    match unquote(token) {
        Some(text) => Symbol::Terminal(text.to_string()),
        None => Symbol::NonTerminal(token.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Lhs,
    Arrow,
    Rhs,
    ChoiceOrEnd,
}

/// Parse a grammar in the bracketed notation.
///
/// Rules have the form `lhs ("->" | "=") rhs ("|" rhs)* ";"` where every `rhs`
/// is a single symbol. A statement cut off by the end of input is dropped
/// without error.
pub fn parse_cfg<R: Read>(mut reader: R) -> Result<Grammar> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;

    let mut grammar = Grammar::new();
    let mut state = State::Lhs;
    let mut lhs = "";
    let mut rule = Vec::new();
    let mut alternatives = Vec::new();

    for token in Lexer::new(&source) {
        match state {
            State::Lhs => {
                lhs = token.text;
                state = State::Arrow;
            }
            State::Arrow => {
                if !is_arrow(token.text) {
                    return Err(GrammarError::ExpectedArrow(token.position));
                }
                state = State::Rhs;
            }
            State::Rhs => {
                rule.push(classify(token.text));
                state = State::ChoiceOrEnd;
            }
            State::ChoiceOrEnd => match token.text {
                "|" => {
                    alternatives.push(Production::new(std::mem::take(&mut rule)));
                    state = State::Rhs;
                }
                ";" => {
                    alternatives.push(Production::new(std::mem::take(&mut rule)));
                    for production in alternatives.drain(..) {
                        grammar.add_production(lhs, production);
                    }
                    state = State::Lhs;
                }
                _ => return Err(GrammarError::ExpectedChoiceOrEnd(token.position)),
            },
        }
    }

    if state != State::Lhs {
        log::debug!("dropping unterminated rule for {:?}", lhs);
    }
    log::debug!("parsed {} non-terminals", grammar.len());
    Ok(grammar)
}

/// Parse a grammar with one rule group per line.
///
/// Each non-blank line reads `lhs ("->" | "=") symbol* ("|" symbol*)*`. Every
/// `|` and the end of the line close an alternative, so `a -> x |` yields the
/// alternatives `x` and the empty production.
pub fn parse_cfg_lines<R: Read>(reader: R) -> Result<Grammar> {
    let mut grammar = Grammar::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() < 2 || !is_arrow(tokens[1]) {
            return Err(GrammarError::MalformedRule { line: index + 1 });
        }

        let lhs = tokens[0];
        let mut rule = Vec::new();
        for &token in &tokens[2..] {
            if token == "|" {
                grammar.add_production(lhs, Production::new(std::mem::take(&mut rule)));
            } else {
                rule.push(classify(token));
            }
        }
        grammar.add_production(lhs, Production::new(rule));
        log::trace!("line {}: rule group for {}", index + 1, lhs);
    }

    log::debug!("parsed {} non-terminals", grammar.len());
    Ok(grammar)
}
