/**
 * String generation strategies.
 */

use std::ops::Range;
use crate::rnd::*;

pub trait StringGenStrategy {
    fn generate(&self) -> String;
}

/**
 * Random string from a charset.
 */

pub struct RandomStringGenerator {
    len: Range<usize>,
    charset: Vec<u8>,
}

impl RandomStringGenerator {
    pub fn with_len_and_charset(len: Range<usize>, charset: &str) -> Self {
        Self{ len, charset: charset.bytes().collect() }
    }
}

impl StringGenStrategy for RandomStringGenerator {
    fn generate(&self) -> String {
        rand_string(&self.len, &self.charset)
    }
}

/**
 * Random regex over a charset. Every generated pattern is well-formed.
 */

pub struct PatternGenerator {
    depth: usize,
    charset: Vec<u8>,
}

impl PatternGenerator {
    /// The charset must only hold bytes that are no regex metacharacters.
    pub fn with_depth_and_charset(depth: usize, charset: &str) -> Self {
        Self{ depth, charset: charset.bytes().collect() }
    }

    fn union(&self, depth: usize, out: &mut String) {
        let branches = rand_range(&(1..3));
        for i in 0..branches {
            if i > 0 {
                out.push('|');
            }
            self.concatenate(depth, out);
        }
    }

    fn concatenate(&self, depth: usize, out: &mut String) {
        for _ in 0..rand_range(&(1..4)) {
            self.basic(depth, out);
        }
    }

    fn basic(&self, depth: usize, out: &mut String) {
        self.primitive(depth, out);
        if rand_bool(0.3) {
            out.push(*sample(&['*', '+', '?']));
        }
    }

    fn primitive(&self, depth: usize, out: &mut String) {
        let choice = if depth == 0 { rand_range(&(0..3)) } else { rand_range(&(0..5)) };
        match choice {
            0 | 1 => out.push(*sample(&self.charset) as char),
            2 => self.set(out),
            _ => {
                out.push('(');
                self.union(depth - 1, out);
                out.push(')');
            },
        }
    }

    fn set(&self, out: &mut String) {
        out.push('[');
        if rand_bool(0.2) {
            out.push('^');
        }
        let a = *sample(&self.charset);
        let b = *sample(&self.charset);
        if a < b && rand_bool(0.5) {
            out.push(a as char);
            out.push('-');
            out.push(b as char);
        }
        else {
            out.push(a as char);
            if a != b {
                out.push(b as char);
            }
        }
        out.push(']');
    }
}

impl StringGenStrategy for PatternGenerator {
    fn generate(&self) -> String {
        let mut out = String::new();
        self.union(self.depth, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_regex_parse::RegexParser;

    #[test]
    fn generated_patterns_parse() {
        set_seed(1234);
        let gen = PatternGenerator::with_depth_and_charset(3, "abc");
        for _ in 0..300 {
            let pattern = gen.generate();
            assert!(RegexParser::new().parse_to_component(&pattern).is_ok(), "{:?}", pattern);
        }
    }
}
