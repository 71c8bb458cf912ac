/**
 * A recursive-descent parser that builds the NFA of a regex directly, without
 * an intermediate syntax tree.
 */

use sl_fsa::{ByteSet, Component, Dfa, NfaManager};
use crate::error::RegexError;

/*
 * Reference grammar for the parser:
 *
 * union       ::=
 *               | concatenate ('|' concatenate)*
 *               ;
 *
 * concatenate ::=
 *               | basic+
 *               ;
 *
 * basic       ::=
 *               | primitive quantifier
 *               | primitive
 *               ;
 *
 * quantifier  ::=
 *               | '?' | '*' | '+'
 *               ;
 *
 * primitive   ::=
 *               | '(' union ')'
 *               | '[' '^'? set_body ']'
 *               | '.'
 *               | '\' escape
 *               | ANY_NONSPECIAL_BYTE
 *               ;
 *
 * set_body    ::=
 *               | '-'? set_element+
 *               ;
 *
 * set_element ::=
 *               | set_atom '-' set_atom
 *               | set_atom
 *               ;
 *
 * set_atom    ::=
 *               | '\' escape
 *               | ANY_BYTE_BUT_RIGHT_BRACKET
 *               ;
 */

/// Bytes matched by `\s`.
const SPACE_BYTES: &[u8] = b" \x0c\n\r\t\x0b";
/// Bytes that stand for themselves after a backslash.
const ESCAPABLE: &[u8] = b"\\.*+?()[]|^-";

/// Position in the pattern. Cheap to copy, so alternatives can keep the
/// position they started from.
#[derive(Clone, Copy)]
struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl <'a> Cursor<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self{ src, pos: 0 }
    }

    fn next(&self) -> Option<(u8, Cursor<'a>)> {
        self.peek().map(|b| (b, Cursor{ src: self.src, pos: self.pos + 1 }))
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }
}

type ParseResult<'a, T> = Result<(T, Cursor<'a>), RegexError>;

fn fail<T>(err: RegexError) -> Result<T, RegexError> {
    log::error!("regex syntax error: {}", err);
    Err(err)
}

/**
 * Actual parsing.
 */

struct Parser<'m> {
    manager: &'m mut NfaManager,
    // Number of groups currently open
    depth: usize,
}

impl <'m> Parser<'m> {
    fn new(manager: &'m mut NfaManager) -> Self {
        Self{ manager, depth: 0 }
    }

    fn parse(&mut self, pattern: &[u8]) -> Result<Component, RegexError> {
        if pattern.is_empty() {
            return fail(RegexError::EmptyPattern);
        }

        let (comp, it) = self.parse_union(Cursor::new(pattern))?;
        match it.peek() {
            None => Ok(comp),
            // Concatenation only stops early at a ')'
            Some(_) => fail(RegexError::UnmatchedCloseParen(it.pos)),
        }
    }

    fn parse_union<'a>(&mut self, it: Cursor<'a>) -> ParseResult<'a, Component> {
        let (mut result, mut it) = self.parse_concatenate(it)?;
        while let Some((b'|', rest)) = it.next() {
            let (rhs, rest) = self.parse_concatenate(rest)?;
            result = self.manager.union(result, rhs);
            it = rest;
        }
        Ok((result, it))
    }

    fn parse_concatenate<'a>(&mut self, it: Cursor<'a>) -> ParseResult<'a, Component> {
        let (mut result, mut it) = self.parse_basic(it)?;
        loop {
            match it.peek() {
                None | Some(b'|') | Some(b')') => break,
                Some(_) => {
                    let (rhs, rest) = self.parse_basic(it)?;
                    result = self.manager.concatenate(result, rhs);
                    it = rest;
                },
            }
        }
        Ok((result, it))
    }

    fn parse_basic<'a>(&mut self, it: Cursor<'a>) -> ParseResult<'a, Component> {
        let (comp, it) = self.parse_primitive(it)?;
        match it.next() {
            Some((b'*', rest)) => Ok((self.manager.kleene_star(comp), rest)),
            Some((b'+', rest)) => Ok((self.manager.least_one(comp), rest)),
            Some((b'?', rest)) => Ok((self.manager.optional(comp), rest)),
            _ => Ok((comp, it)),
        }
    }

    fn parse_primitive<'a>(&mut self, it: Cursor<'a>) -> ParseResult<'a, Component> {
        match it.next() {
            Some((b'(', rest)) => {
                self.depth += 1;
                let (comp, rest) = self.parse_union(rest)?;
                self.depth -= 1;
                match rest.next() {
                    Some((b')', rest)) => Ok((comp, rest)),
                    _ => fail(RegexError::UnmatchedOpenParen(it.pos)),
                }
            },

            Some((b'[', _)) => {
                let (mask, rest) = parse_set(it)?;
                Ok((self.manager.component_from_set(mask), rest))
            },

            Some((b'.', rest)) => Ok((self.manager.component_from_set(ByteSet::full()), rest)),

            Some((b'\\', rest)) => {
                let (mask, rest) = parse_escape(rest)?;
                Ok((self.manager.component_from_set(mask), rest))
            },

            Some((b')', _)) if self.depth == 0 => fail(RegexError::UnmatchedCloseParen(it.pos)),

            Some((b'*', _)) | Some((b'+', _)) | Some((b'?', _)) | Some((b'|', _)) | Some((b')', _)) =>
                fail(RegexError::NothingToRepeat(it.pos)),

            Some((b, rest)) => Ok((self.manager.component_from_byte(b), rest)),

            None => fail(RegexError::UnexpectedEnd(it.pos)),
        }
    }
}

/// Parses what follows a backslash. `it` points right after the backslash.
fn parse_escape(it: Cursor<'_>) -> ParseResult<'_, ByteSet> {
    let (b, rest) = match it.next() {
        Some(next) => next,
        None => return fail(RegexError::UnexpectedEnd(it.pos)),
    };

    let mask = match b {
        b'd' => digits(),
        b'D' => digits().inverted(),
        b's' => ByteSet::with_bytes(SPACE_BYTES),
        b'S' => ByteSet::with_bytes(SPACE_BYTES).inverted(),
        b'w' => word(),
        b'W' => word().inverted(),

        b'n' => ByteSet::singleton(b'\n'),
        b't' => ByteSet::singleton(b'\t'),
        b'r' => ByteSet::singleton(b'\r'),
        b'f' => ByteSet::singleton(b'\x0c'),
        b'v' => ByteSet::singleton(b'\x0b'),

        b if ESCAPABLE.contains(&b) => ByteSet::singleton(b),

        // The error points at the backslash
        byte => return fail(RegexError::UnknownEscape{ at: it.pos - 1, byte }),
    };
    Ok((mask, rest))
}

fn digits() -> ByteSet {
    ByteSet::with_range(b'0', b'9')
}

fn word() -> ByteSet {
    let mut s = ByteSet::with_range(b'a', b'z');
    s.insert_range(b'A', b'Z');
    s.insert_range(b'0', b'9');
    s.insert(b'_');
    s
}

/// A set element before any range is formed: either one byte or a whole
/// class from an escape like `\d`.
enum SetAtom {
    Byte(u8),
    Class(ByteSet),
}

fn parse_set_atom(it: Cursor<'_>) -> ParseResult<'_, SetAtom> {
    match it.next() {
        Some((b'\\', rest)) => {
            let (mask, rest) = parse_escape(rest)?;
            // Literal escapes are single bytes and may bound a range
            if mask.len() == 1 {
                if let Some(b) = mask.iter().next() {
                    return Ok((SetAtom::Byte(b), rest));
                }
            }
            Ok((SetAtom::Class(mask), rest))
        },
        Some((b, rest)) => Ok((SetAtom::Byte(b), rest)),
        None => Err(RegexError::UnexpectedEnd(it.pos)),
    }
}

/// Parses a bracketed set. `it` points at the opening bracket.
fn parse_set(it: Cursor<'_>) -> ParseResult<'_, ByteSet> {
    let open = it.pos;
    let mut rest = match it.next() {
        Some((b'[', rest)) => rest,
        _ => return fail(RegexError::UnexpectedEnd(it.pos)),
    };

    let negated = match rest.next() {
        Some((b'^', after)) => {
            rest = after;
            true
        },
        _ => false,
    };

    let mut mask = ByteSet::new();
    let mut elements = 0;

    // A leading '-' is an ordinary member
    if let Some((b'-', after)) = rest.next() {
        mask.insert(b'-');
        elements += 1;
        rest = after;
    }

    loop {
        match rest.next() {
            None => return fail(RegexError::UnterminatedSet(open)),
            Some((b']', after)) => {
                rest = after;
                break;
            },
            Some((b'-', _)) => return fail(RegexError::DanglingRange(rest.pos)),
            Some(_) => { },
        }

        let lo_at = rest.pos;
        let (lo, after) = match parse_set_atom(rest) {
            Ok(parsed) => parsed,
            Err(RegexError::UnexpectedEnd(_)) => return fail(RegexError::UnterminatedSet(open)),
            Err(err) => return Err(err),
        };
        elements += 1;

        let dash = after.pos;
        match (lo, after.next()) {
            (lo, Some((b'-', after_dash))) => {
                let lo = match lo {
                    SetAtom::Byte(b) => b,
                    SetAtom::Class(_) => return fail(RegexError::DanglingRange(dash)),
                };
                let hi = match after_dash.next() {
                    None => return fail(RegexError::UnterminatedSet(open)),
                    Some((b']', _)) => return fail(RegexError::DanglingRange(dash)),
                    Some(_) => match parse_set_atom(after_dash) {
                        Ok((SetAtom::Byte(b), after_hi)) => {
                            rest = after_hi;
                            b
                        },
                        Ok((SetAtom::Class(_), _)) => return fail(RegexError::DanglingRange(dash)),
                        Err(RegexError::UnexpectedEnd(_)) => return fail(RegexError::UnterminatedSet(open)),
                        Err(err) => return Err(err),
                    },
                };
                if lo >= hi {
                    return fail(RegexError::InvalidRange{ at: lo_at, lo, hi });
                }
                mask.insert_range(lo, hi);
            },

            (SetAtom::Byte(b), _) => {
                mask.insert(b);
                rest = after;
            },

            (SetAtom::Class(class), _) => {
                mask.insert_all(&class);
                rest = after;
            },
        }
    }

    if elements == 0 {
        return fail(RegexError::EmptySet(open));
    }
    if negated {
        mask.invert();
    }
    Ok((mask, rest))
}

/**
 * Public interface.
 */

/// Compiles regex patterns into automata. All components are allocated in
/// the parser's `NfaManager`, so components of several patterns can be
/// combined before building one automaton from them.
#[derive(Debug, Default)]
pub struct RegexParser {
    manager: NfaManager,
}

impl RegexParser {
    pub fn new() -> Self {
        Self{ manager: NfaManager::new() }
    }

    pub fn with_manager(manager: NfaManager) -> Self {
        Self{ manager }
    }

    /// Parses the pattern into a component of this parser's manager.
    pub fn parse_to_component(&mut self, pattern: &str) -> Result<Component, RegexError> {
        Parser::new(&mut self.manager).parse(pattern.as_bytes())
    }

    /// Parses the pattern and compiles it into a minimal DFA.
    pub fn parse_to_dfa(&mut self, pattern: &str) -> Result<Dfa, RegexError> {
        let comp = self.parse_to_component(pattern)?;
        let nfa = self.manager.build_nfa(comp);
        Ok(Dfa::from_nfa(&nfa).minimize())
    }

    pub fn manager(&self) -> &NfaManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut NfaManager {
        &mut self.manager
    }

    pub fn into_manager(self) -> NfaManager {
        self.manager
    }
}

/// Escapes every metacharacter, so the result matches `literal` exactly.
pub fn escape(literal: &str) -> String {
    let mut res = String::with_capacity(literal.len());
    for c in literal.chars() {
        if c.is_ascii() && ESCAPABLE.contains(&(c as u8)) {
            res.push('\\');
        }
        res.push(c);
    }
    res
}

// Tests ///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod regex_parser_tests {
    use super::*;

    fn dfa(pattern: &str) -> Dfa {
        RegexParser::new().parse_to_dfa(pattern).unwrap()
    }

    fn err(pattern: &str) -> RegexError {
        RegexParser::new().parse_to_dfa(pattern).unwrap_err()
    }

    fn assert_matches(pattern: &str, yes: &[&str], no: &[&str]) {
        let d = dfa(pattern);
        for s in yes {
            assert!(d.is_match(s.as_bytes()), "{:?} should match {:?}", pattern, s);
        }
        for s in no {
            assert!(!d.is_match(s.as_bytes()), "{:?} should not match {:?}", pattern, s);
        }
    }

    #[test]
    fn concatenate_simple_string() {
        assert_matches("abcd", &["abcd"], &["abc", "abcde", ""]);
    }

    #[test]
    fn union_simple() {
        assert_matches("ab|xy|01", &["ab", "xy", "01"], &["a", "abxy", "10"]);
    }

    #[test]
    fn concatenate_postfix() {
        assert_matches("ab*c+d?e",
            &["ace", "abccde", "abbccce"],
            &["abde", "abcdde", "abcd"]);
    }

    #[test]
    fn union_postfix() {
        assert_matches("a*b+|c?d",
            &["ab", "b", "aabb", "cd", "d"],
            &["a", "ac", "ccd", "c"]);
    }

    #[test]
    fn group() {
        assert_matches("(a|b)*X|H(1|2+)?",
            &["aaaX", "bbX", "X", "ababbbaaX", "H", "H1", "H2", "H2222"],
            &["XH", "aabababa", "H12", "2222"]);
    }

    #[test]
    fn set() {
        assert_matches("[abc]+X[0-9]?[a-zH0-9]+",
            &["bX9aH9", "abcX5cHHH1230H", "abcabcXaH0aH0", "cX0123"],
            &["dX0a", "aXD"]);
    }

    #[test]
    fn meta_char() {
        assert_matches(r"\d\s\w\W\\",
            &["0\t_@\\", "9\nZ#\\"],
            &["0\t@@\\", "0\t_@", "a\t_@\\", "00__\\"]);
    }

    #[test]
    fn negated_classes() {
        assert_matches(r"\D\S", &["a.", "_x", " a"], &["1a", "a ", "  ", "1 "]);
    }

    #[test]
    fn dot_is_any_byte() {
        assert_matches("a.c", &["abc", "a.c", "a\nc", "a\u{7f}c"], &["ac", "abbc"]);
    }

    #[test]
    fn negated_set() {
        assert_matches("[^a-c]", &["d", "z", "\n"], &["a", "b", "c", "dd"]);
    }

    #[test]
    fn set_with_escapes_and_leading_dash() {
        assert_matches(r"[-\]\d]", &["-", "]", "5"], &["a", "\\"]);
        assert_matches(r"[\--/]", &["-", ".", "/"], &[","]);
        assert_matches(r"[^\s]", &["a"], &[" ", "\t"]);
    }

    #[test]
    fn control_escapes() {
        assert_matches(r"\n\t\r", &["\n\t\r"], &["ntr"]);
    }

    #[test]
    fn bracket_closes_at_first_bracket() {
        // The second ']' is a literal outside the set
        assert_matches("[a]]", &["a]"], &["a", "]]"]);
    }

    #[test]
    fn escaped_literal_roundtrip() {
        let lit = "a+b*(c)|[d].e?\\f^g-h";
        assert_matches(&escape(lit), &[lit], &["a+b*(c)", "ab"]);
        assert_eq!(escape("<="), "<=");
        assert_eq!(escape("++"), r"\+\+");
    }

    #[test]
    fn components_share_the_manager() {
        let mut parser = RegexParser::new();
        let a = parser.parse_to_component("ab").unwrap();
        let b = parser.parse_to_component("cd").unwrap();
        let u = parser.manager_mut().union(a, b);
        let d = Dfa::from_nfa(&parser.manager().build_nfa(u));
        assert!(d.is_match(b"ab"));
        assert!(d.is_match(b"cd"));
        assert!(!d.is_match(b"abcd"));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(err(""), RegexError::EmptyPattern);
        assert_eq!(err("(ab"), RegexError::UnmatchedOpenParen(0));
        assert_eq!(err("a(b|c"), RegexError::UnmatchedOpenParen(1));
        assert_eq!(err("ab)"), RegexError::UnmatchedCloseParen(2));
        assert_eq!(err(")"), RegexError::UnmatchedCloseParen(0));
        assert_eq!(err("[abc"), RegexError::UnterminatedSet(0));
        assert_eq!(err("x[a-"), RegexError::UnterminatedSet(1));
        assert_eq!(err("[]"), RegexError::EmptySet(0));
        assert_eq!(err("[^]"), RegexError::EmptySet(0));
        assert_eq!(err("[z-a]"), RegexError::InvalidRange{ at: 1, lo: b'z', hi: b'a' });
        assert_eq!(err("[a-a]"), RegexError::InvalidRange{ at: 1, lo: b'a', hi: b'a' });
        assert_eq!(err(r"[\.-!]"), RegexError::InvalidRange{ at: 1, lo: b'.', hi: b'!' });
        assert_eq!(err(r"[ab\n-\t]"), RegexError::InvalidRange{ at: 3, lo: b'\n', hi: b'\t' });
        assert_eq!(err("[a-]"), RegexError::DanglingRange(2));
        assert_eq!(err(r"[\d-z]"), RegexError::DanglingRange(3));
        assert_eq!(err("[a-c-e]"), RegexError::DanglingRange(4));
        assert_eq!(err(r"a\q"), RegexError::UnknownEscape{ at: 1, byte: b'q' });
        assert_eq!(err("a\\"), RegexError::UnexpectedEnd(2));
        assert_eq!(err("a|"), RegexError::UnexpectedEnd(2));
        assert_eq!(err("*a"), RegexError::NothingToRepeat(0));
        assert_eq!(err("a**"), RegexError::NothingToRepeat(2));
        assert_eq!(err("a||b"), RegexError::NothingToRepeat(2));
        assert_eq!(err("()"), RegexError::NothingToRepeat(1));
    }

    #[test]
    fn errors_report_offsets() {
        assert_eq!(err("ab)").offset(), Some(2));
        assert_eq!(err("").offset(), None);
        assert_eq!(err(r"a\q").to_string(), r"unknown escape '\q' at 1");
        assert_eq!(err("[z-a]").to_string(), "invalid range 'z-a' at 1");
    }

    #[test]
    fn manager_can_be_handed_over() {
        let mut first = RegexParser::new();
        let ab = first.parse_to_component("ab").unwrap();

        // Components of the first parser stay valid in the manager it hands on
        let mut second = RegexParser::with_manager(first.into_manager());
        let cd = second.parse_to_component("c+d").unwrap();
        let both = second.manager_mut().union(ab, cd);

        let manager = second.into_manager();
        let nfa = manager.build_nfa(both);
        assert!(nfa.is_match(b"ab"));
        assert!(nfa.is_match(b"cccd"));
        assert!(!nfa.is_match(b"abcd"));
    }
}
