/**
 * Error kinds of building and running a tokenizer.
 */

use thiserror::Error;
use sl_fsa::NfaError;
use sl_regex_parse::RegexError;

fn esc(b: &u8) -> String {
    std::ascii::escape_default(*b).to_string()
}

/// No pattern matches the input at a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not get next token at ({row}, {column}): unexpected '{}'", esc(.byte))]
pub struct LexError {
    pub row: usize,
    pub column: usize,
    /// Byte offset in the source.
    pub offset: usize,
    pub byte: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("pattern {index} ({pattern:?}) is malformed: {source}")]
    Pattern{
        index: usize,
        pattern: String,
        #[source]
        source: RegexError,
    },

    #[error("no token patterns were given")]
    NoPatterns,

    #[error(transparent)]
    Nfa(#[from] NfaError),
}

/// Any error of the lexing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Regex(#[from] RegexError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Lex(#[from] LexError),
}
