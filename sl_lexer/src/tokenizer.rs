/**
 * The table-driven tokenizer: one minimal DFA over all token patterns, run
 * with maximal munch.
 */

use std::sync::Arc;
use rustc_hash::FxHashSet;
use sl_fsa::Dfa;
use crate::error::LexError;
use crate::position::Cursor;
use crate::symbol::Symbol;
use crate::token::Token;

/// Built by `TokenizerBuilder`. Holds no lexing state, so one tokenizer can
/// serve any number of sources.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pub(crate) dfa: Arc<Dfa>,
    // Indexed by the priority of an end state
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) ignore: FxHashSet<Symbol>,
    pub(crate) line_comment: Option<String>,
    pub(crate) block_comment: Option<(String, String)>,
    pub(crate) newline: Symbol,
    pub(crate) first_row: usize,
}

impl Tokenizer {
    pub fn dfa(&self) -> Arc<Dfa> {
        Arc::clone(&self.dfa)
    }

    /// The symbol of the pattern with the given priority.
    pub fn symbol_for_priority(&self, priority: usize) -> Option<Symbol> {
        self.symbols.get(priority).copied()
    }

    pub fn is_ignored(&self, symbol: Symbol) -> bool {
        self.ignore.contains(&symbol)
    }

    pub fn newline_symbol(&self) -> Symbol {
        self.newline
    }

    /// A cursor at the beginning of a source.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.first_row)
    }

    /// Recognizes the longest token at the cursor and steps over it. When no
    /// pattern matches at least one byte, an error token with empty text is
    /// returned and the cursor stays where it was.
    pub fn next_token(&self, source: &str, cursor: &mut Cursor) -> Token {
        let bytes = source.as_bytes();
        let row = cursor.row;
        let column = cursor.column();

        let rest = &bytes[cursor.pos.min(bytes.len())..];
        let (len, priority) = match self.dfa.longest_match(rest) {
            Some((len, priority)) if len > 0 => (len, priority),
            _ => return Token::new(String::new(), Symbol::ERROR, row, column),
        };

        let symbol = priority
            .and_then(|p| self.symbol_for_priority(p))
            .unwrap_or(Symbol::ERROR);
        let consumed = &rest[..len];
        let text = if symbol == self.newline {
            "\\n".to_string()
        }
        else {
            String::from_utf8_lossy(consumed).into_owned()
        };

        cursor.advance(consumed);
        Token::new(text, symbol, row, column)
    }

    /// Steps over one comment at the cursor, if there is one. A line comment
    /// ends after its newline, an unterminated block comment at the end of
    /// the source.
    pub fn skip_comment(&self, source: &str, cursor: &mut Cursor) -> bool {
        let bytes = source.as_bytes();
        let rest = &bytes[cursor.pos.min(bytes.len())..];

        if let Some(start) = &self.line_comment {
            if rest.starts_with(start.as_bytes()) {
                let len = match rest.iter().position(|b| *b == b'\n') {
                    Some(lf) => lf + 1,
                    None => rest.len(),
                };
                cursor.advance(&rest[..len]);
                return true;
            }
        }

        if let Some((start, end)) = &self.block_comment {
            if rest.starts_with(start.as_bytes()) {
                let body = &rest[start.len()..];
                let len = match find(body, end.as_bytes()) {
                    Some(idx) => start.len() + idx + end.len(),
                    None => {
                        log::warn!("block comment at ({}, {}) is never closed", cursor.row, cursor.column());
                        rest.len()
                    },
                };
                cursor.advance(&rest[..len]);
                return true;
            }
        }

        false
    }

    /// Lazily tokenizes the source. Ignored tokens and comments are skipped,
    /// runs of newline tokens yield one token. Iteration stops after the
    /// first error.
    pub fn iter<'t, 's>(&'t self, source: &'s str) -> Iter<'t, 's> {
        Iter{ tokenizer: self, source, cursor: self.cursor(), last_was_newline: false, finished: false }
    }

    pub fn lexical_analyze(&self, source: &str) -> Result<Vec<Token>, LexError> {
        self.iter(source).collect()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/**
 * Iterate over all tokens.
 */

pub struct Iter<'t, 's> {
    tokenizer: &'t Tokenizer,
    source: &'s str,
    cursor: Cursor,
    last_was_newline: bool,
    finished: bool,
}

impl <'t, 's> Iter<'t, 's> {
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl <'t, 's> Iterator for Iter<'t, 's> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            while self.tokenizer.skip_comment(self.source, &mut self.cursor) { }

            if self.cursor.pos >= self.source.len() {
                self.finished = true;
                return None;
            }

            let token = self.tokenizer.next_token(self.source, &mut self.cursor);
            if token.is_error() {
                self.finished = true;
                let err = LexError{
                    row: token.row,
                    column: token.column,
                    offset: self.cursor.pos,
                    byte: self.source.as_bytes()[self.cursor.pos],
                };
                log::error!("{}", err);
                return Some(Err(err));
            }

            if self.tokenizer.is_ignored(token.symbol) {
                continue;
            }

            let is_newline = token.symbol == self.tokenizer.newline;
            if is_newline && self.last_was_newline {
                continue;
            }
            self.last_was_newline = is_newline;
            return Some(Ok(token));
        }
    }
}

impl std::iter::FusedIterator for Iter<'_, '_> { }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TokenizerBuilder;

    const WORD: Symbol = Symbol::terminal(Symbol::START_ID + 1, "Word");
    const LT: Symbol = Symbol::terminal(Symbol::START_ID + 2, "LT");
    const LE: Symbol = Symbol::terminal(Symbol::START_ID + 3, "LE");

    fn words() -> Tokenizer {
        TokenizerBuilder::new()
            .set_patterns(vec![
                (r"\w+", WORD),
                ("<", LT),
                ("<=", LE),
                (" ", Symbol::SPACE),
                ("\n", Symbol::LF),
            ])
            .set_line_comment("#")
            .set_block_comment("{", "}")
            .build()
            .unwrap()
    }

    #[test]
    fn next_token_is_maximal() {
        let t = words();
        let mut c = t.cursor();
        let tok = t.next_token("<=<", &mut c);
        assert_eq!(tok, Token::new("<=", LE, 1, 0));
        let tok = t.next_token("<=<", &mut c);
        assert_eq!(tok, Token::new("<", LT, 1, 2));
        assert_eq!(c.pos, 3);
    }

    #[test]
    fn error_token_keeps_the_cursor() {
        let t = words();
        let mut c = t.cursor();
        let tok = t.next_token("?ab", &mut c);
        assert!(tok.is_error());
        assert_eq!(tok.text, "");
        assert_eq!(c, t.cursor());
    }

    #[test]
    fn comments_are_skipped_one_at_a_time() {
        let t = words();
        let src = "# one\n{two\n}x";
        let mut c = t.cursor();
        assert!(t.skip_comment(src, &mut c));
        assert_eq!((c.pos, c.row), (6, 2));
        assert!(t.skip_comment(src, &mut c));
        assert_eq!((c.pos, c.row, c.column()), (12, 3, 1));
        assert!(!t.skip_comment(src, &mut c));
        assert_eq!(t.next_token(src, &mut c), Token::new("x", WORD, 3, 1));
    }

    #[test]
    fn unterminated_block_comment_runs_to_the_end() {
        let t = words();
        let tokens = t.lexical_analyze("a {b\nc").unwrap();
        assert_eq!(tokens, vec![Token::new("a", WORD, 1, 0)]);
    }

    #[test]
    fn newline_runs_collapse() {
        let t = words();
        let tokens = t.lexical_analyze("a\n\n\nb\n").unwrap();
        assert_eq!(tokens, vec![
            Token::new("a", WORD, 1, 0),
            Token::new("\\n", Symbol::LF, 1, 1),
            Token::new("b", WORD, 4, 0),
            Token::new("\\n", Symbol::LF, 4, 1),
        ]);
    }

    #[test]
    fn iteration_stops_at_the_first_error() {
        let t = words();
        let mut it = t.iter("ab\n c?d");
        assert_eq!(it.next(), Some(Ok(Token::new("ab", WORD, 1, 0))));
        assert_eq!(it.next(), Some(Ok(Token::new("\\n", Symbol::LF, 1, 2))));
        assert_eq!(it.next(), Some(Ok(Token::new("c", WORD, 2, 1))));
        assert_eq!(it.next(), Some(Err(LexError{ row: 2, column: 2, offset: 5, byte: b'?' })));
        assert_eq!(it.next(), None);
        assert_eq!(it.cursor().pos, 5);
    }

    #[test]
    fn accessors() {
        let t = words();
        assert_eq!(t.symbol_for_priority(2), Some(LE));
        assert_eq!(t.symbol_for_priority(5), None);
        assert!(t.is_ignored(Symbol::SPACE));
        assert!(!t.is_ignored(Symbol::LF));
        assert_eq!(t.newline_symbol(), Symbol::LF);
        assert!(t.dfa().is_match(b"<="));
    }
}
