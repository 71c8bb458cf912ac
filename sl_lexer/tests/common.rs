use sl_lexer::{Symbol, Token};

/// Compares tokens with `(text, symbol, row, column)` expectations, one by
/// one, so the first difference is the one reported.
pub fn assert_tokens(actual: &[Token], expected: &[(&str, Symbol, usize, usize)]) {
    let mut i1 = actual.iter();
    let mut i2 = expected.iter();
    let mut idx = 0;
    loop {
        match (i1.next(), i2.next()) {
            (Some(a), Some(&(text, symbol, row, column))) => {
                assert_eq!(*a, Token::new(text, symbol, row, column), "token {} differs", idx);
            },
            (None, None) => return,
            (Some(a), None) => panic!("unexpected extra token {} ({})!", idx, a),
            (None, Some(b)) => panic!("missing token {} ({:?})!", idx, b),
        }
        idx += 1;
    }
}
