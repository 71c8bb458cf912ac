/**
 * A dense set of bytes, used as the character-class mask on NFA edges.
 */

use std::fmt;

const WORDS: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteSet {
    bits: [u64; WORDS],
}

impl ByteSet {
    pub fn new() -> Self {
        Self{ bits: [0; WORDS] }
    }

    /// The set of every byte value.
    pub fn full() -> Self {
        Self{ bits: [u64::MAX; WORDS] }
    }

    pub fn singleton(b: u8) -> Self {
        let mut s = Self::new();
        s.insert(b);
        s
    }

    /// Inclusive on both ends. An empty set is returned when `lo > hi`.
    pub fn with_range(lo: u8, hi: u8) -> Self {
        let mut s = Self::new();
        s.insert_range(lo, hi);
        s
    }

    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut s = Self::new();
        for b in bytes {
            s.insert(*b);
        }
        s
    }

    pub fn insert(&mut self, b: u8) {
        self.bits[(b >> 6) as usize] |= 1 << (b & 63);
    }

    pub fn insert_range(&mut self, lo: u8, hi: u8) {
        if lo > hi {
            return;
        }
        for b in lo..=hi {
            self.insert(b);
        }
    }

    pub fn insert_all(&mut self, other: &ByteSet) {
        for (w, o) in self.bits.iter_mut().zip(other.bits.iter()) {
            *w |= *o;
        }
    }

    pub fn contains(&self, b: u8) -> bool {
        self.bits[(b >> 6) as usize] & (1 << (b & 63)) != 0
    }

    pub fn invert(&mut self) {
        for w in self.bits.iter_mut() {
            *w = !*w;
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=255u8).filter(move |b| self.contains(*b))
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        // Print as runs, so full and negated sets stay readable
        let mut it = self.iter().peekable();
        while let Some(lo) = it.next() {
            let mut hi = lo;
            while let Some(&next) = it.peek() {
                if next as u16 != hi as u16 + 1 {
                    break;
                }
                hi = next;
                it.next();
            }
            if lo == hi {
                write!(f, "{}", std::ascii::escape_default(lo))?;
            }
            else {
                write!(f, "{}-{}", std::ascii::escape_default(lo), std::ascii::escape_default(hi))?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let s = ByteSet::with_range(b'0', b'9');
        assert_eq!(s.len(), 10);
        assert!(s.contains(b'0'));
        assert!(s.contains(b'9'));
        assert!(!s.contains(b'/'));
        assert!(!s.contains(b':'));
    }

    #[test]
    fn backwards_range_is_empty() {
        assert!(ByteSet::with_range(b'z', b'a').is_empty());
    }

    #[test]
    fn invert_covers_high_bytes() {
        let s = ByteSet::singleton(b'a').inverted();
        assert_eq!(s.len(), 255);
        assert!(!s.contains(b'a'));
        assert!(s.contains(0));
        assert!(s.contains(255));
    }

    #[test]
    fn full_set_has_every_byte() {
        assert_eq!(ByteSet::full().len(), 256);
        assert!(ByteSet::full().inverted().is_empty());
    }

    #[test]
    fn iter_is_ascending() {
        let s = ByteSet::with_bytes(b"zax");
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![b'a', b'x', b'z']);
    }

    #[test]
    fn debug_prints_runs() {
        let mut s = ByteSet::with_range(b'a', b'c');
        s.insert(b'x');
        assert_eq!(format!("{:?}", s), "[a-cx]");
    }
}
