/**
 * The token set of a small C-like language.
 */

use crate::builder::TokenizerBuilder;
use crate::error::BuildError;
use crate::symbol::Symbol;
use crate::tokenizer::Tokenizer;

const fn word(offset: u32, name: &'static str) -> Symbol {
    Symbol::terminal(Symbol::START_ID + offset, name)
}

// Single-character operators use their character as id
const fn punct(c: u8, name: &'static str) -> Symbol {
    Symbol::terminal(c as u32, name)
}

// keywords
pub const IF: Symbol = word(11, "If");
pub const ELSE: Symbol = word(12, "Else");
pub const FOR: Symbol = word(13, "For");
pub const BREAK: Symbol = word(14, "Break");
pub const WHILE: Symbol = word(15, "While");
pub const DO: Symbol = word(16, "Do");
pub const INT: Symbol = word(21, "Int");
pub const PRINTF: Symbol = word(22, "Printf");

pub const IDENTIFIER: Symbol = word(23, "Identifier");
pub const NUMBER: Symbol = word(24, "Number");
pub const STRING: Symbol = word(25, "String");

pub const ADD: Symbol = punct(b'+', "Add");
pub const SUB: Symbol = punct(b'-', "Sub");
pub const MUL: Symbol = punct(b'*', "Mul");
pub const DIV: Symbol = punct(b'/', "Div");
pub const ASSIGN: Symbol = punct(b'=', "Assign");
pub const SEMICOLON: Symbol = punct(b';', "Semicolon");
pub const COMMA: Symbol = punct(b',', "Comma");
pub const LT: Symbol = punct(b'<', "LT");
pub const GT: Symbol = punct(b'>', "GT");
pub const LEFT_PAREN: Symbol = punct(b'(', "LeftParen");
pub const RIGHT_PAREN: Symbol = punct(b')', "RightParen");
pub const LEFT_BRACE: Symbol = punct(b'{', "LeftBrace");
pub const RIGHT_BRACE: Symbol = punct(b'}', "RightBrace");

pub const INC: Symbol = word(31, "Inc");
pub const DEC: Symbol = word(32, "Dec");
pub const LE: Symbol = word(33, "LE");
pub const GE: Symbol = word(34, "GE");
pub const EQ: Symbol = word(35, "EQ");
pub const NE: Symbol = word(36, "NE");

/// The patterns in priority order: keywords before identifiers, longer
/// operators before their prefixes.
pub fn patterns() -> Vec<(&'static str, Symbol)> {
    vec![
        (r"[ \v\t\f]", Symbol::SPACE),
        (r"\r?\n", Symbol::LF),

        ("if", IF),
        ("else", ELSE),
        ("for", FOR),
        ("break", BREAK),
        ("while", WHILE),
        ("do", DO),
        ("int", INT),
        ("printf", PRINTF),

        (r"\+\+", INC),
        ("--", DEC),
        ("<=", LE),
        (">=", GE),
        ("==", EQ),
        ("!=", NE),

        ("{", LEFT_BRACE),
        ("}", RIGHT_BRACE),
        (r"\(", LEFT_PAREN),
        (r"\)", RIGHT_PAREN),
        (",", COMMA),
        (";", SEMICOLON),
        ("=", ASSIGN),
        (r"\+", ADD),
        ("-", SUB),
        (r"\*", MUL),
        ("/", DIV),
        ("<", LT),
        (">", GT),

        (r"0[xX][0-9a-fA-F]+|\d+", NUMBER),
        (r#""([^"\\\n]|\\.)*""#, STRING),
        (r"[a-zA-Z_]\w*", IDENTIFIER),
    ]
}

/// Spaces and line breaks are ignored, `//` and `/* */` are comments.
pub fn tokenizer() -> Result<Tokenizer, BuildError> {
    TokenizerBuilder::new()
        .set_line_comment("//")
        .set_block_comment("/*", "*/")
        .set_ignore_set(vec![Symbol::SPACE, Symbol::LF])
        .set_patterns(patterns())
        .build()
}
