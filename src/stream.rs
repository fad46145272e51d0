use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::grammar::{Grammar, Symbol};
use crate::utils::Result;

/// Configuration options for token stream output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Appended by [`TokenStream::produce`] when the length budget runs out
    pub truncation_marker: String,
    /// Seed for [`TokenStream::from_config`]; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            truncation_marker: "...".to_string(),
            seed: None,
        }
    }
}

impl StreamConfig {
    /// Read a configuration from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Lazily derives a random string of terminals from a grammar.
///
/// Each call to [`TokenStream::next_token`] performs leftmost expansion on an
/// explicit stack until a terminal surfaces. Alternatives are picked uniformly
/// with the injected generator. A non-terminal without alternatives is emitted
/// as its own name.
///
/// Derivation is not guaranteed to terminate: a grammar whose alternatives keep
/// expanding without ever reaching a terminal will loop in `next_token`.
#[derive(Debug, Clone)]
pub struct TokenStream<'g, R> {
    grammar: &'g Grammar,
    stack: Vec<Symbol>,
    rng: R,
    config: StreamConfig,
}

impl<'g, R: Rng> TokenStream<'g, R> {
    /// Create a stream deriving `start_symbol` with the given generator
    pub fn new(grammar: &'g Grammar, start_symbol: &str, rng: R) -> Self {
        log::debug!("new token stream starting at {:?}", start_symbol);
        TokenStream {
            grammar,
            stack: vec![Symbol::NonTerminal(start_symbol.to_string())],
            rng,
            config: StreamConfig::default(),
        }
    }

    /// Replace the stream configuration
    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// True once every symbol has been derived
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }

    /// Produce the next terminal token, or `None` when the derivation is done.
    ///
    /// Empty terminals are returned as `Some("")`.
    pub fn next_token(&mut self) -> Option<String> {
        let grammar = self.grammar;
        while let Some(symbol) = self.stack.pop() {
            let name = match symbol {
                Symbol::Terminal(text) => return Some(text),
                Symbol::NonTerminal(name) => name,
            };

            match grammar.productions(&name) {
                Some(productions) if !productions.is_empty() => {
                    let production = &productions[self.rng.gen_range(0..productions.len())];
                    log::trace!("expand {} -> {}", name, production);
                    self.stack.extend(production.symbols.iter().rev().cloned());
                }
                _ => {
                    log::trace!("no rule for {}, emitting it verbatim", name);
                    return Some(name);
                }
            }
        }

        None
    }

    /// Concatenate tokens until the stream ends or `stop_after` bytes are used.
    ///
    /// The token that overruns the budget is still appended whole, followed by
    /// the truncation marker, so the result may exceed `stop_after` by up to one
    /// token plus the marker.
    pub fn produce(&mut self, stop_after: usize) -> String {
        let mut remaining = stop_after;
        let mut output = String::new();

        while let Some(token) = self.next_token() {
            output.push_str(&token);

            let len = token.len();
            if len > remaining {
                output.push_str(&self.config.truncation_marker);
                log::debug!("length budget of {} exhausted", stop_after);
                break;
            }
            remaining -= len;
        }

        output
    }
}

impl<'g> TokenStream<'g, StdRng> {
    /// Create a stream with a deterministic generator
    pub fn seeded(grammar: &'g Grammar, start_symbol: &str, seed: u64) -> Self {
        Self::new(grammar, start_symbol, StdRng::seed_from_u64(seed))
    }

    /// Create a stream from a configuration, seeding from entropy when no seed is set
    pub fn from_config(grammar: &'g Grammar, start_symbol: &str, config: StreamConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(grammar, start_symbol, rng).with_config(config)
    }
}

impl<R: Rng> Iterator for TokenStream<'_, R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_token()
    }
}

impl<R: Rng> std::iter::FusedIterator for TokenStream<'_, R> {}
