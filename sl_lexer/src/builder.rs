/**
 * Configuration and construction of a `Tokenizer`.
 */

use std::sync::Arc;
use rustc_hash::FxHashSet;
use sl_fsa::Dfa;
use sl_regex_parse::RegexParser;
use crate::error::BuildError;
use crate::symbol::Symbol;
use crate::tokenizer::Tokenizer;

/// The automaton compiled from a pattern list.
#[derive(Debug, Clone)]
struct Compiled {
    dfa: Arc<Dfa>,
    symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct TokenizerBuilder {
    compiled: Result<Compiled, BuildError>,
    ignore: FxHashSet<Symbol>,
    line_comment: Option<String>,
    block_comment: Option<(String, String)>,
    newline: Symbol,
    first_row: usize,
}

impl TokenizerBuilder {
    pub fn new() -> Self {
        Self{
            compiled: Err(BuildError::NoPatterns),
            ignore: FxHashSet::default(),
            line_comment: None,
            block_comment: None,
            newline: Symbol::LF,
            first_row: 1,
        }
    }

    /// Compiles the `(regex, symbol)` pairs into one automaton. Earlier
    /// patterns win over later ones matching the same text. Replaces the
    /// patterns of any earlier call.
    pub fn set_patterns<I, S>(mut self, patterns: I) -> Self
        where I : IntoIterator<Item = (S, Symbol)>, S : AsRef<str> {

        self.compiled = compile(patterns);
        if let Err(err) = &self.compiled {
            log::error!("could not build the token automaton: {}", err);
        }
        self
    }

    /// Symbols whose tokens are dropped from the output. `Symbol::SPACE`
    /// when left empty.
    pub fn set_ignore_set<I>(mut self, symbols: I) -> Self
        where I : IntoIterator<Item = Symbol> {

        self.ignore = symbols.into_iter().collect();
        self
    }

    /// An empty delimiter disables line comments.
    pub fn set_line_comment(mut self, start: &str) -> Self {
        self.line_comment = if start.is_empty() { None } else { Some(start.into()) };
        self
    }

    /// An empty start delimiter disables block comments.
    pub fn set_block_comment(mut self, start: &str, end: &str) -> Self {
        self.block_comment = if start.is_empty() { None } else { Some((start.into(), end.into())) };
        self
    }

    /// The symbol of newline tokens, `Symbol::LF` by default.
    pub fn set_newline_symbol(mut self, symbol: Symbol) -> Self {
        self.newline = symbol;
        self
    }

    /// The row number of the first line, 1 by default.
    pub fn set_first_row(mut self, row: usize) -> Self {
        self.first_row = row;
        self
    }

    /// Whether `build` would fail.
    pub fn is_error(&self) -> bool {
        self.compiled.is_err()
    }

    pub fn build(self) -> Result<Tokenizer, BuildError> {
        let Compiled{ dfa, symbols } = self.compiled?;
        let mut ignore = self.ignore;
        if ignore.is_empty() {
            ignore.insert(Symbol::SPACE);
        }
        Ok(Tokenizer{
            dfa,
            symbols,
            ignore,
            line_comment: self.line_comment,
            block_comment: self.block_comment,
            newline: self.newline,
            first_row: self.first_row,
        })
    }
}

impl Default for TokenizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn compile<I, S>(patterns: I) -> Result<Compiled, BuildError>
    where I : IntoIterator<Item = (S, Symbol)>, S : AsRef<str> {

    let mut parser = RegexParser::new();
    let mut comps = Vec::new();
    let mut symbols = Vec::new();

    // The index of a pattern is its priority
    for (index, (pattern, symbol)) in patterns.into_iter().enumerate() {
        let pattern = pattern.as_ref();
        let comp = parser.parse_to_component(pattern)
            .map_err(|source| BuildError::Pattern{ index, pattern: pattern.into(), source })?;
        parser.manager_mut().set_priority(comp.end(), index);
        comps.push(comp);
        symbols.push(symbol);
    }

    let all = parser.manager_mut()
        .union_all_with_multi_end(comps)?
        .ok_or(BuildError::NoPatterns)?;
    let nfa = parser.manager().build_nfa(all);
    let dfa = Dfa::from_nfa(&nfa).minimize();
    log::debug!("token automaton for {} patterns: {} NFA nodes, {} DFA states",
        symbols.len(), nfa.len(), dfa.len());

    Ok(Compiled{ dfa: Arc::new(dfa), symbols })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_regex_parse::RegexError;

    const K110: Symbol = Symbol::terminal(Symbol::START_ID + 1, "110");
    const NUMBER: Symbol = Symbol::terminal(Symbol::START_ID + 2, "Number");

    #[test]
    fn build_dfa() {
        let t = TokenizerBuilder::new()
            .set_patterns(vec![("110", K110), ("[0123]+", NUMBER)])
            .build()
            .unwrap();
        let dfa = t.dfa();
        assert!(dfa.is_match(b"110"));
        assert!(dfa.is_match(b"01230123"));
        assert!(!dfa.is_match(b"1104"));
        // "110" is matched by both, the earlier pattern wins
        assert_eq!(dfa.longest_match(b"110"), Some((3, Some(0))));
        assert_eq!(dfa.longest_match(b"1101"), Some((4, Some(1))));
    }

    #[test]
    fn malformed_pattern_is_reported_with_its_index() {
        let b = TokenizerBuilder::new().set_patterns(vec![("a", K110), ("(b", NUMBER)]);
        assert!(b.is_error());
        assert_eq!(b.build().unwrap_err(), BuildError::Pattern{
            index: 1,
            pattern: "(b".into(),
            source: RegexError::UnmatchedOpenParen(0),
        });
    }

    #[test]
    fn no_patterns() {
        assert!(TokenizerBuilder::new().is_error());
        let empty: Vec<(&str, Symbol)> = Vec::new();
        let b = TokenizerBuilder::new().set_patterns(empty);
        assert_eq!(b.build().unwrap_err(), BuildError::NoPatterns);
    }

    #[test]
    fn later_patterns_replace_earlier_ones() {
        let b = TokenizerBuilder::new()
            .set_patterns(vec![("(", K110)])
            .set_patterns(vec![("1", K110)]);
        assert!(!b.is_error());
        assert!(b.build().is_ok());
    }

    #[test]
    fn defaults() {
        let t = TokenizerBuilder::default()
            .set_patterns(vec![("a", K110)])
            .build()
            .unwrap();
        assert!(t.is_ignored(Symbol::SPACE));
        assert_eq!(t.newline_symbol(), Symbol::LF);
        assert_eq!(t.cursor().row, 1);
        assert!(t.line_comment.is_none());
        assert!(t.block_comment.is_none());
    }

    #[test]
    fn explicit_ignore_set_replaces_the_default() {
        let t = TokenizerBuilder::new()
            .set_patterns(vec![("a", K110), (" ", Symbol::SPACE)])
            .set_ignore_set(vec![K110])
            .set_first_row(0)
            .build()
            .unwrap();
        assert!(t.is_ignored(K110));
        assert!(!t.is_ignored(Symbol::SPACE));
        let tokens = t.lexical_analyze("a a").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].symbol, Symbol::SPACE);
        assert_eq!((tokens[0].row, tokens[0].column), (0, 1));
    }
}
