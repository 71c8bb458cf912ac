/**
 * Regex syntax errors. Every variant except `EmptyPattern` carries the byte
 * offset in the pattern where the problem was found.
 */

use thiserror::Error;

fn esc(b: &u8) -> String {
    std::ascii::escape_default(*b).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("the pattern is empty")]
    EmptyPattern,

    #[error("unexpected end of pattern at {0}")]
    UnexpectedEnd(usize),

    #[error("'(' at {0} is never closed")]
    UnmatchedOpenParen(usize),

    #[error("')' at {0} has no matching '('")]
    UnmatchedCloseParen(usize),

    #[error("set starting at {0} is never closed")]
    UnterminatedSet(usize),

    #[error("set at {0} has no elements")]
    EmptySet(usize),

    #[error("invalid range '{}-{}' at {at}", esc(.lo), esc(.hi))]
    InvalidRange{ at: usize, lo: u8, hi: u8 },

    #[error("'-' at {0} does not form a range")]
    DanglingRange(usize),

    #[error("unknown escape '\\{}' at {at}", esc(.byte))]
    UnknownEscape{ at: usize, byte: u8 },

    #[error("nothing to repeat at {0}")]
    NothingToRepeat(usize),
}

impl RegexError {
    /// Byte offset of the error in the pattern.
    pub fn offset(&self) -> Option<usize> {
        match self {
            RegexError::EmptyPattern => None,
            RegexError::UnexpectedEnd(at)
            | RegexError::UnmatchedOpenParen(at)
            | RegexError::UnmatchedCloseParen(at)
            | RegexError::UnterminatedSet(at)
            | RegexError::EmptySet(at)
            | RegexError::InvalidRange{ at, .. }
            | RegexError::DanglingRange(at)
            | RegexError::UnknownEscape{ at, .. }
            | RegexError::NothingToRepeat(at) => Some(*at),
        }
    }
}
