//! Random string generation from context-free grammars.
//!
//! A [`Grammar`] maps non-terminal names to alternative productions. It is
//! usually parsed from text in one of two notations, then handed to a
//! [`TokenStream`] that performs random leftmost derivations and yields the
//! terminals one at a time.
//!
//! # Example
//!
//! ```rust
//! use tokenstream::{Grammar, TokenStream};
//!
//! let grammar = Grammar::from_lines_str(
//!     "greeting -> 'Hello' ',' subject\n\
//!      subject = 'world' | 'Rust'",
//! )
//! .unwrap();
//!
//! let mut stream = TokenStream::seeded(&grammar, "greeting", 7);
//! let text = stream.produce(80);
//! assert!(text == "Hello,world" || text == "Hello,Rust");
//! ```

pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod stream;
pub mod utils;

pub use grammar::{Grammar, GrammarBuilder, Production, Symbol};
pub use lexer::Position;
pub use parser::{parse_cfg, parse_cfg_lines};
pub use stream::{StreamConfig, TokenStream};
pub use utils::{GrammarError, Result};
