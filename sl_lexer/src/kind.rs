/**
 * Token kinds as a Rust enum. `#[derive(TokenKind)]` implements the trait
 * from attributes on the variants.
 */

use crate::builder::TokenizerBuilder;
use crate::error::{BuildError, Error};
use crate::symbol::Symbol;
use crate::token::Token;
use crate::tokenizer::Tokenizer;

pub trait TokenKind : Sized + Copy + Eq + 'static {
    /// The `(regex, kind)` pairs, in priority order.
    fn patterns() -> &'static [(&'static str, Self)];

    fn symbol(self) -> Symbol;
    fn from_symbol(symbol: Symbol) -> Option<Self>;

    /// Kinds dropped from the output.
    fn ignored() -> &'static [Self] {
        &[]
    }

    /// The kind that counts as a line break, if it isn't bound to `Symbol::LF`.
    fn newline() -> Option<Self> {
        None
    }

    fn line_comment() -> Option<&'static str> {
        None
    }

    fn block_comment() -> Option<(&'static str, &'static str)> {
        None
    }

    fn tokenizer() -> Result<Tokenizer, BuildError> {
        let patterns = Self::patterns().iter().map(|(p, k)| (*p, k.symbol()));
        let mut builder = TokenizerBuilder::new()
            .set_patterns(patterns)
            .set_ignore_set(Self::ignored().iter().map(|k| k.symbol()));

        if let Some(nl) = Self::newline() {
            builder = builder.set_newline_symbol(nl.symbol());
        }
        if let Some(start) = Self::line_comment() {
            builder = builder.set_line_comment(start);
        }
        if let Some((start, end)) = Self::block_comment() {
            builder = builder.set_block_comment(start, end);
        }
        builder.build()
    }
}

/// Tokenizes the source with the tokenizer of `K`, pairing every token with
/// its kind.
pub fn lex<K>(source: &str) -> Result<Vec<(K, Token)>, Error> where K : TokenKind {
    let tokenizer = K::tokenizer()?;
    let tokens = tokenizer.lexical_analyze(source)?;
    Ok(tokens.into_iter()
        .filter_map(|t| K::from_symbol(t.symbol).map(|k| (k, t)))
        .collect())
}
