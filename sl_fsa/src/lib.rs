/**
 * Byte-level finite state automata: the NFA graph algebra regexes are built
 * with, subset construction into a DFA and DFA minimization.
 */

extern crate log;
extern crate rustc_hash;
extern crate thiserror;

mod byte_set;
mod number_set;
mod node;
pub mod nfa;
pub mod dfa;
mod minimize;

pub use byte_set::ByteSet;
pub use number_set::NumberSet;
pub use node::NodeState;
pub use nfa::{Component, EpsilonClosures, Nfa, NfaEdge, NfaError, NfaManager, NfaNode, NodeId};
pub use dfa::{Dfa, DfaNode, StateId};
