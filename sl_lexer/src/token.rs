/**
 * Token definition.
 */

use std::fmt;
use crate::symbol::Symbol;

/// A piece of source text with the symbol it was recognized as. Rows count
/// from the tokenizer's first row, columns from 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub symbol: Symbol,
    pub row: usize,
    pub column: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, symbol: Symbol, row: usize, column: usize) -> Self {
        Self{ text: text.into(), symbol, row, column }
    }

    pub fn is_error(&self) -> bool {
        self.symbol == Symbol::ERROR
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token {{ P({}, {}), {}, {} }}", self.row, self.column, self.symbol, self.text)
    }
}
