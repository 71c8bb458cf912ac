/**
 * A tokenizer built from prioritized regex patterns. All patterns are
 * compiled into one minimal DFA, which is then run with maximal munch.
 */

extern crate sl_fsa;
extern crate sl_regex_parse;
extern crate sl_lexer_derive;
extern crate log;
extern crate rustc_hash;
extern crate thiserror;

mod symbol;
mod token;
mod position;
mod error;
mod tokenizer;
mod builder;
mod kind;
pub mod clike;

pub use sl_lexer_derive::TokenKind;

pub use symbol::{Symbol, SymbolType};
pub use token::Token;
pub use position::Cursor;
pub use error::{BuildError, Error, LexError};
pub use tokenizer::{Iter, Tokenizer};
pub use builder::TokenizerBuilder;
pub use kind::{lex, TokenKind};

pub use sl_regex_parse::{escape, RegexError};
