/**
 * Shared, immutable sets of node numbers.
 *
 * These are the keys of subset construction: one DFA state per distinct set
 * of NFA nodes, and one block per set of DFA states while minimizing. The
 * underlying set is reference counted, so putting a set both into a map and
 * onto a worklist does not copy it.
 */

use std::collections::BTreeSet;
use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NumberSet(Rc<BTreeSet<usize>>);

impl NumberSet {
    pub fn new() -> Self {
        Self(Rc::new(BTreeSet::new()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, n: usize) -> bool {
        self.0.contains(&n)
    }

    pub fn first(&self) -> Option<usize> {
        self.0.iter().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl From<BTreeSet<usize>> for NumberSet {
    fn from(set: BTreeSet<usize>) -> Self {
        Self(Rc::new(set))
    }
}

impl FromIterator<usize> for NumberSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(Rc::new(iter.into_iter().collect()))
    }
}

impl <'a> IntoIterator for &'a NumberSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl fmt::Debug for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}
