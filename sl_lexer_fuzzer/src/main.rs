extern crate sl_fsa;
extern crate sl_regex_parse;
extern crate sl_lexer;
extern crate log;
extern crate thiserror;
extern crate rand;
extern crate rand_pcg;

mod rnd;
mod str_gen;
mod checks;

use std::process;
use str_gen::*;
use checks::*;

const ROUNDS: usize = 200;
const SAMPLES: usize = 200;

/// Usage: sl_lexer_fuzzer [seed] [rounds]
fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rnd::seed_from_system_time);
    let rounds = args.next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(ROUNDS);

    rnd::set_seed(seed);
    println!("fuzzing with seed {} for {} rounds", rnd::current_seed(), rounds);

    let patterns = PatternGenerator::with_depth_and_charset(3, "abc");
    let inputs = RandomStringGenerator::with_len_and_charset(0..16, "abcd");

    for round in 0..rounds {
        let result = check_automata(&patterns.generate(), &inputs, SAMPLES).and_then(|_| {
            let count = rnd::rand_range(&(1..5));
            let set: Vec<String> = (0..count).map(|_| patterns.generate()).collect();
            check_tokenizer(&set, &inputs, SAMPLES)
        });

        if let Err(err) = result {
            println!("round {} failed (seed {}): {}", round, rnd::current_seed(), err);
            process::exit(1);
        }
    }

    println!("all {} rounds passed", rounds);
}
