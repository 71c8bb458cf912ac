/**
 * State tags shared by NFA and DFA nodes.
 */

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    Start,
    End,
    StartEnd,
    Normal,
}

impl NodeState {
    pub fn is_start(self) -> bool {
        matches!(self, NodeState::Start | NodeState::StartEnd)
    }

    pub fn is_end(self) -> bool {
        matches!(self, NodeState::End | NodeState::StartEnd)
    }

    pub fn is_normal(self) -> bool {
        self == NodeState::Normal
    }

    /// The state after tagging a node that is currently `self` with `other`.
    /// Start and End combine, StartEnd absorbs either of them, anything else
    /// overwrites.
    pub fn attach(self, other: NodeState) -> NodeState {
        use NodeState::*;
        match (self, other) {
            (Start, End) | (End, Start) => StartEnd,
            (StartEnd, Start) | (StartEnd, End) => StartEnd,
            (_, other) => other,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeState::Start => "start",
            NodeState::End => "end",
            NodeState::StartEnd => "start/end",
            NodeState::Normal => "normal",
        };
        f.write_str(s)
    }
}

/// Folds an end node's priority into an accumulated one. The smaller set
/// priority wins; an unset priority never beats a set one.
pub(crate) fn fold_priority(current: Option<usize>, other: Option<usize>) -> Option<usize> {
    match (current, other) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, other) => other,
    }
}
