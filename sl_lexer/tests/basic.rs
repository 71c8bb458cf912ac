mod common;

use sl_lexer::{BuildError, LexError, RegexError, Symbol, Tokenizer, TokenizerBuilder};
use common::assert_tokens;

const NUMBER: Symbol = Symbol::terminal(Symbol::START_ID + 2, "Number");
const IF: Symbol = Symbol::terminal(Symbol::START_ID + 3, "If");
const WORD: Symbol = Symbol::terminal(Symbol::START_ID + 4, "Word");
const LT: Symbol = Symbol::terminal(Symbol::START_ID + 5, "LT");
const LE: Symbol = Symbol::terminal(Symbol::START_ID + 6, "LE");

fn sample_tokenizer(first_row: usize) -> Tokenizer {
    TokenizerBuilder::new()
        .set_patterns(vec![
            ("if", IF),
            (r"\d+", NUMBER),
            (r"\w+", WORD),
            ("[ \t\x0b\x0c\r]", Symbol::SPACE),
            ("\n", Symbol::LF),
        ])
        .set_first_row(first_row)
        .build()
        .unwrap()
}

#[test]
fn lexical_analyze_from_row_zero() {
    let tokens = sample_tokenizer(0).lexical_analyze("if there\tare\n\n1000 dogs").unwrap();
    assert_tokens(&tokens, &[
        ("if", IF, 0, 0),
        ("there", WORD, 0, 3),
        ("are", WORD, 0, 9),
        ("\\n", Symbol::LF, 0, 12),
        ("1000", NUMBER, 2, 0),
        ("dogs", WORD, 2, 5),
    ]);
}

#[test]
fn rows_start_at_one_by_default() {
    let tokens = sample_tokenizer(1).lexical_analyze("if there\tare\n\n1000 dogs").unwrap();
    assert_eq!(tokens.len(), 6);
    assert_eq!((tokens[0].row, tokens[0].column), (1, 0));
    assert_eq!((tokens[4].row, tokens[4].column), (3, 0));
}

#[test]
fn skip_comments() {
    let tokenizer = TokenizerBuilder::new()
        .set_patterns(vec![
            (r"\w+", WORD),
            ("[ \t\x0b\x0c\r]", Symbol::SPACE),
            ("\n", Symbol::LF),
        ])
        .set_line_comment("//")
        .set_block_comment("/*", "*/")
        .build()
        .unwrap();

    let source = "hello // world\n\
                  /* test block 1 \n test block 2 */\n\
                  computer world";
    let tokens = tokenizer.lexical_analyze(source).unwrap();
    assert_tokens(&tokens, &[
        ("hello", WORD, 1, 0),
        ("\\n", Symbol::LF, 3, 16),
        ("computer", WORD, 4, 0),
        ("world", WORD, 4, 9),
    ]);
}

#[test]
fn earlier_pattern_wins_a_tie() {
    let tokenizer = TokenizerBuilder::new()
        .set_patterns(vec![("if", IF), (r"\w+", WORD), (" ", Symbol::SPACE)])
        .build()
        .unwrap();
    let tokens = tokenizer.lexical_analyze("if iff i").unwrap();
    assert_tokens(&tokens, &[
        ("if", IF, 1, 0),
        ("iff", WORD, 1, 3),
        ("i", WORD, 1, 7),
    ]);
}

#[test]
fn maximal_munch() {
    let tokenizer = TokenizerBuilder::new()
        .set_patterns(vec![("<", LT), ("<=", LE)])
        .build()
        .unwrap();
    let tokens = tokenizer.lexical_analyze("<=<<=").unwrap();
    assert_tokens(&tokens, &[
        ("<=", LE, 1, 0),
        ("<", LT, 1, 2),
        ("<=", LE, 1, 3),
    ]);
}

#[test]
fn error_aborts_the_analysis() {
    let tokenizer = sample_tokenizer(1);
    let err = tokenizer.lexical_analyze("if x\n  y $ z").unwrap_err();
    assert_eq!(err, LexError{ row: 2, column: 4, offset: 9, byte: b'$' });
    assert_eq!(err.to_string(), "could not get next token at (2, 4): unexpected '$'");
}

#[test]
fn malformed_pattern_fails_the_build() {
    let builder = TokenizerBuilder::new().set_patterns(vec![("ok", WORD), ("[z-a]", NUMBER)]);
    assert!(builder.is_error());
    match builder.build() {
        Err(BuildError::Pattern{ index, source, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(source, RegexError::InvalidRange{ at: 1, lo: b'z', hi: b'a' });
        },
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn custom_newline_symbol() {
    const EOL: Symbol = Symbol::terminal(Symbol::START_ID + 7, "EOL");
    let tokenizer = TokenizerBuilder::new()
        .set_patterns(vec![(r"\w+", WORD), (r"\r?\n", EOL)])
        .set_newline_symbol(EOL)
        .build()
        .unwrap();
    let tokens = tokenizer.lexical_analyze("a\r\n\r\nb").unwrap();
    assert_tokens(&tokens, &[
        ("a", WORD, 1, 0),
        ("\\n", EOL, 1, 1),
        ("b", WORD, 3, 0),
    ]);
}

#[test]
fn tokenizers_share_their_automaton() {
    let tokenizer = sample_tokenizer(1);
    let copy = tokenizer.clone();
    assert!(std::sync::Arc::ptr_eq(&tokenizer.dfa(), &copy.dfa()));
    assert_eq!(copy.lexical_analyze("if").unwrap(), tokenizer.lexical_analyze("if").unwrap());
}
