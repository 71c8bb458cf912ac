/**
 * Regex parsing on top of the automata of `sl_fsa`.
 */

extern crate sl_fsa;
extern crate log;
extern crate thiserror;

mod error;
mod parser;

pub use error::RegexError;
pub use parser::{escape, RegexParser};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Mcg128Xsl64;
    use sl_fsa::Dfa;

    // The parsed NFA, its DFA and the minimal DFA all accept the same strings
    #[test]
    fn pipeline_agrees_with_nfa() {
        let patterns = [
            "(a|b)*abb",
            "a(b|c)*d?",
            "[a-c]+|c*d",
            r"(\d|a)+b?",
            "((ab)*|c)+",
        ];
        let mut rng = Mcg128Xsl64::seed_from_u64(1997);

        for pattern in patterns.iter() {
            let mut parser = RegexParser::new();
            let comp = parser.parse_to_component(pattern).unwrap();
            let nfa = parser.manager().build_nfa(comp);
            let dfa = Dfa::from_nfa(&nfa);
            let min = dfa.minimize();

            for _ in 0..500 {
                let len = rng.gen_range(0, 9);
                let s: Vec<u8> = (0..len).map(|_| b"abcd1"[rng.gen_range(0, 5)]).collect();
                let expected = nfa.is_match(&s);
                assert_eq!(dfa.is_match(&s), expected, "{} on {:?}", pattern, s);
                assert_eq!(min.is_match(&s), expected, "{} on {:?}", pattern, s);
            }
        }
    }
}
