/**
 * Random utilities. One generator per thread, reseedable so a failing run
 * can be reproduced from its seed.
 */

use std::cell::RefCell;
use std::ops::Range;
use std::time::SystemTime;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

thread_local! {
    static RNG: RefCell<Mcg128Xsl64> = RefCell::new(Mcg128Xsl64::new(0));
    static SEED: RefCell<u64> = RefCell::new(0);
}

pub fn seed_from_system_time() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn current_seed() -> u64 {
    SEED.with(|s| *s.borrow())
}

pub fn set_seed(s: u64) {
    RNG.with(|rng| rng.replace(Mcg128Xsl64::seed_from_u64(s)));
    SEED.with(|seed| *seed.borrow_mut() = s);
}

/// A number in the range. The range must not be empty.
pub fn rand_range(r: &Range<usize>) -> usize {
    RNG.with(|rng| rng.borrow_mut().gen_range(r.start, r.end))
}

pub fn rand_bool(p: f64) -> bool {
    RNG.with(|rng| rng.borrow_mut().gen_bool(p))
}

pub fn sample<T>(s: &[T]) -> &T {
    assert!(!s.is_empty());
    &s[rand_range(&(0..s.len()))]
}

pub fn rand_string(len: &Range<usize>, charset: &[u8]) -> String {
    let len = rand_range(len);
    (0..len).map(|_| *sample(charset) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_numbers() {
        set_seed(42);
        let a: Vec<_> = (0..10).map(|_| rand_range(&(0..1000))).collect();
        set_seed(42);
        let b: Vec<_> = (0..10).map(|_| rand_range(&(0..1000))).collect();
        assert_eq!(a, b);
        assert_eq!(current_seed(), 42);
    }

    #[test]
    fn strings_respect_length_and_charset() {
        set_seed(7);
        for _ in 0..100 {
            let s = rand_string(&(2..5), b"xy");
            assert!((2..5).contains(&s.len()));
            assert!(s.bytes().all(|b| b == b'x' || b == b'y'));
        }
    }
}
