use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use crate::parser;
use crate::utils::Result;

/// Represents a symbol in the grammar, either a terminal or a non-terminal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// A terminal symbol (literal text)
    Terminal(String),
    /// A non-terminal symbol (reference to another rule)
    NonTerminal(String),
}

impl Symbol {
    /// The terminal value or non-terminal name
    pub fn text(&self) -> &str {
        match self {
            Symbol::Terminal(text) | Symbol::NonTerminal(text) => text,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// Terminals print double-quoted without escaping, so only terminals free of
/// whitespace read back unchanged through the line notation.
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(text) => write!(f, "\"{}\"", text),
            Symbol::NonTerminal(name) => f.write_str(name),
        }
    }
}

/// One alternative right-hand side of a non-terminal.
///
/// An empty production derives the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Production {
    /// The sequence of symbols in this production, leftmost first
    pub symbols: Vec<Symbol>,
}

impl Production {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Production { symbols }
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<Vec<Symbol>> for Production {
    fn from(symbols: Vec<Symbol>) -> Self {
        Production { symbols }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.symbols.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// A context-free grammar: non-terminal names mapped to their alternatives.
///
/// No validation happens on construction. Cycles, unreachable names and empty
/// alternative lists are all legal; the derivation engine decides what an
/// unresolved name means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grammar {
    rules: HashMap<String, Vec<Production>>,
}

impl Grammar {
    /// Create a new empty grammar
    pub fn new() -> Self {
        Grammar {
            rules: HashMap::new(),
        }
    }

    /// Parse a grammar in the bracketed `LHS -> rhs | rhs ;` notation
    pub fn from_cfg<R: Read>(reader: R) -> Result<Self> {
        parser::parse_cfg(reader)
    }

    /// Parse a grammar in the bracketed notation from a string
    pub fn from_cfg_str(source: &str) -> Result<Self> {
        parser::parse_cfg(source.as_bytes())
    }

    /// Parse a grammar in the one-rule-group-per-line notation
    pub fn from_lines<R: Read>(reader: R) -> Result<Self> {
        parser::parse_cfg_lines(reader)
    }

    /// Parse a grammar in the line notation from a string
    pub fn from_lines_str(source: &str) -> Result<Self> {
        parser::parse_cfg_lines(source.as_bytes())
    }

    /// Load a grammar previously written with [`Grammar::to_json`]
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the grammar as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append an alternative for `non_terminal`, keeping earlier ones
    pub fn add_production(&mut self, non_terminal: &str, production: Production) -> &mut Self {
        self.rules
            .entry(non_terminal.to_string())
            .or_default()
            .push(production);
        self
    }

    /// Register `non_terminal` with no alternatives if it is not known yet
    pub fn declare(&mut self, non_terminal: &str) -> &mut Self {
        self.rules.entry(non_terminal.to_string()).or_default();
        self
    }

    /// Add a rule from string elements.
    ///
    /// Elements written as `<name>` become non-terminals, everything else is
    /// taken as literal terminal text. An empty slice adds an empty production.
    pub fn add_rule(&mut self, non_terminal: &str, elements: &[&str]) -> &mut Self {
        let symbols = elements.iter().map(|e| Self::parse_element(e)).collect();
        self.add_production(non_terminal, Production::new(symbols))
    }

    fn parse_element(element: &str) -> Symbol {
        match element
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            Some(name) if !name.is_empty() => Symbol::NonTerminal(name.to_string()),
            _ => Symbol::Terminal(element.to_string()),
        }
    }

    /// The alternatives registered for `name`, or `None` if it was never defined
    pub fn productions(&self, name: &str) -> Option<&[Production]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    /// Check if the grammar contains a specific non-terminal
    pub fn has_non_terminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Names of all defined non-terminals, sorted
    pub fn non_terminals(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get a reference to the grammar's rules
    pub fn rules(&self) -> &HashMap<String, Vec<Production>> {
        &self.rules
    }

    /// Number of defined non-terminals
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for Grammar {
    /// Renders the grammar in line notation, one non-terminal per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.non_terminals() {
            write!(f, "{} ->", name)?;
            for (i, production) in self.rules[name].iter().enumerate() {
                if i > 0 {
                    f.write_str(" |")?;
                }
                if !production.is_empty() {
                    write!(f, " {}", production)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builder for constructing Grammar instances
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder {
            grammar: Grammar::new(),
        }
    }

    /// Add a rule to the grammar
    pub fn add_rule(mut self, non_terminal: &str, elements: &[&str]) -> Self {
        self.grammar.add_rule(non_terminal, elements);
        self
    }

    /// Add a prebuilt production
    pub fn add_production(mut self, non_terminal: &str, production: Production) -> Self {
        self.grammar.add_production(non_terminal, production);
        self
    }

    /// Build the grammar
    pub fn build(self) -> Grammar {
        self.grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> Symbol {
        Symbol::Terminal(s.to_string())
    }

    fn nt(s: &str) -> Symbol {
        Symbol::NonTerminal(s.to_string())
    }

    #[test]
    fn test_add_rule_elements() {
        let mut grammar = Grammar::new();
        grammar.add_rule("query", &["SELECT", "<column>", "FROM", "<table>", "<>"]);

        let productions = grammar.productions("query").unwrap();
        assert_eq!(productions.len(), 1);
        assert_eq!(
            productions[0].symbols,
            vec![t("SELECT"), nt("column"), t("FROM"), nt("table"), t("<>")]
        );
    }

    #[test]
    fn test_symbol_accessors() {
        assert_eq!(t("if").text(), "if");
        assert_eq!(nt("stmt").text(), "stmt");
        assert!(t("if").is_terminal());
        assert!(!nt("stmt").is_terminal());
        assert_eq!(t("if").to_string(), "\"if\"");
        assert_eq!(nt("stmt").to_string(), "stmt");
    }

    #[test]
    fn test_builder_with_prebuilt_productions() {
        let grammar = GrammarBuilder::new()
            .add_production("S", Production::from(vec![t("a"), nt("T")]))
            .add_production("S", Production::default())
            .add_rule("T", &["c"])
            .build();

        let rules = grammar.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules["S"][0].symbols, vec![t("a"), nt("T")]);
        assert!(rules["S"][1].is_empty());
        assert_eq!(grammar.non_terminals(), vec!["S", "T"]);
    }

    #[test]
    fn test_display_splits_terminals_with_whitespace() {
        let grammar = GrammarBuilder::new()
            .add_rule("greeting", &["Hello, world!"])
            .build();

        let printed = grammar.to_string();
        assert_eq!(printed, "greeting -> \"Hello, world!\"\n");

        let reparsed = Grammar::from_lines_str(&printed).unwrap();
        assert_eq!(
            reparsed.productions("greeting").unwrap()[0].symbols,
            vec![nt("\"Hello,"), nt("world!\"")]
        );
        assert_ne!(reparsed, grammar);
    }

    #[test]
    fn test_alternatives_accumulate() {
        let grammar = GrammarBuilder::new()
            .add_rule("subject", &["world"])
            .add_rule("greeting", &["Hello", "<subject>"])
            .add_rule("subject", &["Rust", "programmers"])
            .build();

        let subject = grammar.productions("subject").unwrap();
        assert_eq!(subject.len(), 2);
        assert_eq!(subject[0].symbols, vec![t("world")]);
        assert_eq!(subject[1].symbols, vec![t("Rust"), t("programmers")]);
        assert_eq!(grammar.len(), 2);
    }

    #[test]
    fn test_absent_and_empty_lookups() {
        let mut grammar = Grammar::new();
        grammar.declare("empty");

        assert!(grammar.productions("missing").is_none());
        assert_eq!(grammar.productions("empty"), Some(&[][..]));
        assert!(grammar.has_non_terminal("empty"));
        assert!(!grammar.has_non_terminal("missing"));
    }

    #[test]
    fn test_display_line_notation() {
        let grammar = GrammarBuilder::new()
            .add_rule("S", &["a", "<T>"])
            .add_rule("S", &[])
            .add_rule("T", &["c"])
            .build();

        assert_eq!(grammar.to_string(), "S -> \"a\" T |\nT -> \"c\"\n");
    }

    #[test]
    fn test_json_round_trip() {
        let grammar = GrammarBuilder::new()
            .add_rule("S", &["a", "<S>"])
            .add_rule("S", &[])
            .build();

        let json = grammar.to_json().unwrap();
        let loaded = Grammar::from_json_str(&json).unwrap();
        assert_eq!(loaded, grammar);
    }
}
