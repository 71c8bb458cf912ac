/**
 * Dense deterministic finite automaton over bytes.
 */

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use rustc_hash::FxHashMap;
use crate::byte_set::ByteSet;
use crate::node::{fold_priority, NodeState};
use crate::nfa::{EpsilonClosures, Nfa};
use crate::number_set::NumberSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn from_index(i: usize) -> Self {
        Self(i)
    }

    pub fn id(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaNode {
    state: NodeState,
    priority: Option<usize>,
    number: usize,
    edges: BTreeMap<u8, StateId>,
}

impl DfaNode {
    pub(crate) fn new(state: NodeState) -> Self {
        Self{ state, priority: None, number: 0, edges: BTreeMap::new() }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_start(&self) -> bool {
        self.state.is_start()
    }

    pub fn is_end(&self) -> bool {
        self.state.is_end()
    }

    pub fn priority(&self) -> Option<usize> {
        self.priority
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn edges(&self) -> &BTreeMap<u8, StateId> {
        &self.edges
    }

    pub fn next(&self, b: u8) -> Option<StateId> {
        self.edges.get(&b).copied()
    }

    pub(crate) fn add_edge(&mut self, b: u8, to: StateId) {
        self.edges.insert(b, to);
    }

    pub(crate) fn attach_state(&mut self, state: NodeState) {
        self.state = self.state.attach(state);
    }

    /// Marks the node as an end node, keeping the best priority seen so far.
    pub(crate) fn fold_end(&mut self, priority: Option<usize>) {
        if self.is_end() {
            self.priority = fold_priority(self.priority, priority);
        }
        else {
            self.attach_state(NodeState::End);
            self.priority = priority;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    start: StateId,
    ends: Vec<StateId>,
    nodes: Vec<DfaNode>,
}

impl Dfa {
    /// Numbers the nodes by position and collects the end nodes.
    pub(crate) fn from_parts(start: StateId, mut nodes: Vec<DfaNode>) -> Self {
        for (i, node) in nodes.iter_mut().enumerate() {
            node.number = i;
        }
        let ends = nodes.iter()
            .filter(|n| n.is_end())
            .map(|n| StateId(n.number))
            .collect();
        Self{ start, ends, nodes }
    }

    pub fn from_nfa(nfa: &Nfa) -> Self {
        DfaConverter::new(nfa).convert()
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn ends(&self) -> &[StateId] {
        &self.ends
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: StateId) -> &DfaNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[DfaNode] {
        &self.nodes
    }

    pub fn step(&self, from: StateId, b: u8) -> Option<StateId> {
        self.nodes[from.0].next(b)
    }

    /// Whether the whole input is accepted.
    pub fn is_match(&self, input: &[u8]) -> bool {
        let mut curr = self.start;
        for &b in input {
            match self.step(curr, b) {
                Some(next) => curr = next,
                None => return false,
            }
        }
        self.nodes[curr.0].is_end()
    }

    /// The longest accepted prefix of the input, as its length and the
    /// priority of the end state it stopped in. Walks as far as transitions
    /// exist, remembering the last end state passed through.
    pub fn longest_match(&self, input: &[u8]) -> Option<(usize, Option<usize>)> {
        let mut curr = self.start;
        let mut last = if self.nodes[curr.0].is_end() {
            Some((0, self.nodes[curr.0].priority))
        }
        else {
            None
        };

        for (i, &b) in input.iter().enumerate() {
            match self.step(curr, b) {
                Some(next) => curr = next,
                None => break,
            }
            let node = &self.nodes[curr.0];
            if node.is_end() {
                last = Some((i + 1, node.priority));
            }
        }

        last
    }
}

impl From<&Nfa> for Dfa {
    fn from(nfa: &Nfa) -> Self {
        Self::from_nfa(nfa)
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            // Group the bytes by destination to keep the dump short
            let mut by_dest: BTreeMap<StateId, ByteSet> = BTreeMap::new();
            for (b, to) in &node.edges {
                by_dest.entry(*to).or_default().insert(*b);
            }
            if by_dest.is_empty() {
                writeln!(f, "{}", DisplayNode(node))?;
            }
            for (to, bytes) in by_dest {
                writeln!(f, "{} --{:?}--> {}", DisplayNode(node), bytes, DisplayNode(&self.nodes[to.0]))?;
            }
        }
        Ok(())
    }
}

struct DisplayNode<'a>(&'a DfaNode);

impl fmt::Display for DisplayNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{}", self.0.number, self.0.state)?;
        if let Some(p) = self.0.priority {
            write!(f, ":{}", p)?;
        }
        write!(f, ")")
    }
}

/**
 * Determinization (subset construction).
 */

struct DfaConverter<'a> {
    nfa: &'a Nfa,
    closures: EpsilonClosures,
    set_to_state: FxHashMap<NumberSet, StateId>,
    // The NFA node set behind each DFA node, by DFA node number
    sets: Vec<NumberSet>,
    nodes: Vec<DfaNode>,
}

impl <'a> DfaConverter<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        Self{
            nfa,
            closures: EpsilonClosures::new(nfa),
            set_to_state: FxHashMap::default(),
            sets: Vec::new(),
            nodes: Vec::new(),
        }
    }

    fn add_state(&mut self, set: NumberSet, state: NodeState) -> StateId {
        let id = StateId(self.nodes.len());
        self.set_to_state.insert(set.clone(), id);
        self.sets.push(set);
        self.nodes.push(DfaNode::new(state));
        id
    }

    /// Every byte that some edge out of the set accepts.
    fn edge_mask(&self, set: &NumberSet) -> ByteSet {
        let mut mask = ByteSet::new();
        for u in set {
            for edge in self.nfa.nodes()[u].edges() {
                mask.insert_all(edge.mask());
            }
        }
        mask
    }

    fn adjacent_set(&mut self, set: &NumberSet, b: u8) -> NumberSet {
        let nfa = self.nfa;
        let mut adjacent = std::collections::BTreeSet::new();
        for u in set {
            for edge in nfa.nodes()[u].edges() {
                if edge.accepts(b) {
                    adjacent.extend(self.closures.closure(nfa, edge.next()).iter());
                }
            }
        }
        NumberSet::from(adjacent)
    }

    fn construct_diagram(&mut self) {
        let start_set = self.closures.closure(self.nfa, self.nfa.start());
        let start = self.add_state(start_set, NodeState::Start);

        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(curr) = queue.pop_front() {
            let curr_set = self.sets[curr.0].clone();
            let live = self.edge_mask(&curr_set);

            for b in live.iter() {
                let adjacent = self.adjacent_set(&curr_set, b);
                let to = match self.set_to_state.get(&adjacent) {
                    Some(to) => *to,
                    None => {
                        let to = self.add_state(adjacent, NodeState::Normal);
                        queue.push_back(to);
                        to
                    },
                };
                self.nodes[curr.0].add_edge(b, to);
            }
        }
    }

    fn mark_end_nodes(&mut self) {
        for (node, set) in self.nodes.iter_mut().zip(self.sets.iter()) {
            for u in set {
                let nfa_node = &self.nfa.nodes()[u];
                if nfa_node.is_end() {
                    node.fold_end(nfa_node.priority());
                }
            }
        }
    }

    fn convert(mut self) -> Dfa {
        if self.nfa.is_empty() {
            return Dfa::from_parts(StateId(0), vec![DfaNode::new(NodeState::Start)]);
        }

        self.construct_diagram();
        self.mark_end_nodes();

        let dfa = Dfa::from_parts(StateId(0), self.nodes);
        log::debug!("converted NFA of {} nodes into DFA of {} states ({} accepting)",
            self.nfa.len(), dfa.len(), dfa.ends().len());
        dfa
    }
}
