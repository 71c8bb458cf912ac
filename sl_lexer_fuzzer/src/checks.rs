/**
 * Differential checks. Each check compares two ways of computing the same
 * answer on random inputs and reports the first disagreement.
 */

use thiserror::Error;
use sl_fsa::Dfa;
use sl_lexer::{BuildError, Symbol, TokenizerBuilder};
use sl_regex_parse::{RegexError, RegexParser};
use crate::str_gen::StringGenStrategy;

#[derive(Debug, Error)]
pub enum Failure {
    #[error("pattern {pattern:?} does not compile: {source}")]
    Regex{
        pattern: String,
        #[source]
        source: RegexError,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("{subject} disagrees on input {input:?}: {detail}")]
    Mismatch{
        subject: String,
        input: String,
        detail: String,
    },
}

fn compile(parser: &mut RegexParser, pattern: &str) -> Result<Dfa, Failure> {
    parser.parse_to_dfa(pattern)
        .map_err(|source| Failure::Regex{ pattern: pattern.into(), source })
}

/// The NFA of the pattern, its DFA and the minimal DFA must accept the same
/// inputs, and minimizing must not grow the automaton.
pub fn check_automata(pattern: &str, inputs: &dyn StringGenStrategy, samples: usize) -> Result<(), Failure> {
    log::debug!("checking automata of {:?}", pattern);
    let mut parser = RegexParser::new();
    let comp = parser.parse_to_component(pattern)
        .map_err(|source| Failure::Regex{ pattern: pattern.into(), source })?;
    let nfa = parser.manager().build_nfa(comp);
    let dfa = Dfa::from_nfa(&nfa);
    let min = dfa.minimize();

    if min.len() > dfa.len() || min.minimize().len() != min.len() {
        return Err(Failure::Mismatch{
            subject: format!("minimized automaton of {:?}", pattern),
            input: String::new(),
            detail: format!("{} states from {}, not minimal", min.len(), dfa.len()),
        });
    }

    for _ in 0..samples {
        let input = inputs.generate();
        let expected = nfa.is_match(input.as_bytes());
        let got = (dfa.is_match(input.as_bytes()), min.is_match(input.as_bytes()));
        if got != (expected, expected) {
            return Err(Failure::Mismatch{
                subject: format!("automata of {:?}", pattern),
                input,
                detail: format!("nfa: {}, dfa: {}, minimal dfa: {}", expected, got.0, got.1),
            });
        }
    }
    Ok(())
}

/// The longest match among the patterns, the earliest pattern on a tie.
fn oracle(dfas: &[Dfa], rest: &[u8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, dfa) in dfas.iter().enumerate() {
        if let Some((len, _)) = dfa.longest_match(rest) {
            if len > 0 && best.map_or(true, |(best_len, _)| len > best_len) {
                best = Some((len, idx));
            }
        }
    }
    best
}

/// The combined tokenizer must split every input the same way as matching
/// each pattern on its own does.
pub fn check_tokenizer(patterns: &[String], inputs: &dyn StringGenStrategy, samples: usize) -> Result<(), Failure> {
    log::debug!("checking tokenizer of {:?}", patterns);
    let symbols: Vec<Symbol> = (0..patterns.len())
        .map(|i| Symbol::terminal(Symbol::START_ID + 1 + i as u32, "Fuzz"))
        .collect();
    let tokenizer = TokenizerBuilder::new()
        .set_patterns(patterns.iter().map(String::as_str).zip(symbols.iter().copied()))
        .build()?;

    let mut parser = RegexParser::new();
    let dfas = patterns.iter()
        .map(|p| compile(&mut parser, p))
        .collect::<Result<Vec<_>, _>>()?;

    for _ in 0..samples {
        let input = inputs.generate();
        let mut cursor = tokenizer.cursor();
        while cursor.pos < input.len() {
            let at = cursor.pos;
            let expected = oracle(&dfas, &input.as_bytes()[at..]);
            let token = tokenizer.next_token(&input, &mut cursor);
            let got = if token.is_error() {
                None
            }
            else {
                symbols.iter().position(|s| *s == token.symbol).map(|idx| (token.text.len(), idx))
            };

            if got != expected {
                return Err(Failure::Mismatch{
                    subject: format!("tokenizer of {:?}", patterns),
                    input,
                    detail: format!("at {} expected (length, pattern) {:?}, got {:?}", at, expected, got),
                });
            }
            if got.is_none() {
                break;
            }
        }
    }
    Ok(())
}
