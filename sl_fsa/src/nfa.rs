/**
 * Nondeterministic finite automaton over bytes.
 *
 * Nodes live in an arena owned by `NfaManager` and are referenced by index.
 * The regex parser never links nodes by hand: it only asks the manager for
 * components and combines them with the operations below.
 */

use std::collections::BTreeSet;
use std::fmt;
use std::mem;
use thiserror::Error;
use crate::byte_set::ByteSet;
use crate::node::NodeState;
use crate::number_set::NumberSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NfaError {
    #[error("end node {} of a multi-end union has no priority", .0.index())]
    UnsetPriority(NodeId),
}

/// A transition guard. An edge with an empty mask is an epsilon edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaEdge {
    mask: ByteSet,
    next: NodeId,
}

impl NfaEdge {
    pub fn new(mask: ByteSet, next: NodeId) -> Self {
        Self{ mask, next }
    }

    pub fn epsilon(next: NodeId) -> Self {
        Self::new(ByteSet::new(), next)
    }

    pub fn is_epsilon(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn accepts(&self, b: u8) -> bool {
        self.mask.contains(b)
    }

    pub fn mask(&self) -> &ByteSet {
        &self.mask
    }

    pub fn next(&self) -> NodeId {
        self.next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaNode {
    state: NodeState,
    priority: Option<usize>,
    number: usize,
    edges: Vec<NfaEdge>,
}

impl NfaNode {
    fn new(state: NodeState, number: usize) -> Self {
        Self{ state, priority: None, number, edges: Vec::new() }
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

    pub fn edges(&self) -> &[NfaEdge] {
        &self.edges
    }
}

/// A fragment with exactly one start and one end node. This is only a handle,
/// the nodes belong to the manager that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    start: NodeId,
    end: NodeId,
}

impl Component {
    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }
}

/**
 * The arena and the graph algebra.
 */

#[derive(Debug, Clone, Default)]
pub struct NfaManager {
    nodes: Vec<NfaNode>,
}

impl NfaManager {
    pub fn new() -> Self {
        Self{ nodes: Vec::new() }
    }

    /// Number of nodes ever allocated, including ones orphaned by splicing.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NfaNode {
        &self.nodes[id.0]
    }

    pub fn priority(&self, id: NodeId) -> Option<usize> {
        self.nodes[id.0].priority
    }

    pub fn set_priority(&mut self, id: NodeId, priority: usize) {
        self.nodes[id.0].priority = Some(priority);
    }

    fn create_node(&mut self, state: NodeState) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NfaNode::new(state, id.0));
        id
    }

    fn add_edge(&mut self, from: NodeId, mask: ByteSet, to: NodeId) {
        self.nodes[from.0].edges.push(NfaEdge::new(mask, to));
    }

    fn add_epsilon(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].edges.push(NfaEdge::epsilon(to));
    }

    fn attach_state(&mut self, id: NodeId, state: NodeState) {
        let node = &mut self.nodes[id.0];
        node.state = node.state.attach(state);
    }

    /// Moves every edge of `from` to the end of `into`'s edge list.
    fn fetch_edges(&mut self, into: NodeId, from: NodeId) {
        let edges = mem::take(&mut self.nodes[from.0].edges);
        self.nodes[into.0].edges.extend(edges);
    }

    pub fn component_from_set(&mut self, mask: ByteSet) -> Component {
        let start = self.create_node(NodeState::Start);
        let end = self.create_node(NodeState::End);
        self.add_edge(start, mask, end);
        Component{ start, end }
    }

    pub fn component_from_byte(&mut self, b: u8) -> Component {
        self.component_from_set(ByteSet::singleton(b))
    }

    /// Inclusive on both ends.
    pub fn component_from_range(&mut self, lo: u8, hi: u8) -> Component {
        self.component_from_set(ByteSet::with_range(lo, hi))
    }

    /// A single transition accepting any of the given bytes.
    pub fn component_from_bytes(&mut self, bytes: &[u8]) -> Component {
        self.component_from_set(ByteSet::with_bytes(bytes))
    }

    /// Accepts `lhs` followed by `rhs`. The end of `lhs` takes over the edges
    /// of `rhs`'s start, which is left orphaned.
    pub fn concatenate(&mut self, lhs: Component, rhs: Component) -> Component {
        self.fetch_edges(lhs.end, rhs.start);
        self.attach_state(rhs.start, NodeState::Normal);
        self.attach_state(lhs.end, NodeState::Normal);
        Component{ start: lhs.start, end: rhs.end }
    }

    /// Accepts `lhs` or `rhs`. Both former ends lead to one fresh end node.
    pub fn union(&mut self, lhs: Component, rhs: Component) -> Component {
        self.fetch_edges(lhs.start, rhs.start);
        self.attach_state(rhs.start, NodeState::Normal);

        let end = self.create_node(NodeState::End);
        self.add_epsilon(lhs.end, end);
        self.add_epsilon(rhs.end, end);
        self.attach_state(lhs.end, NodeState::Normal);
        self.attach_state(rhs.end, NodeState::Normal);

        Component{ start: lhs.start, end }
    }

    /// Like `union`, but both end nodes stay end nodes with their own
    /// priority. The returned component's end is `lhs`'s end.
    pub fn union_with_multi_end(&mut self, lhs: Component, rhs: Component)
        -> Result<Component, NfaError> {

        if self.priority(lhs.end).is_none() {
            return Err(NfaError::UnsetPriority(lhs.end));
        }
        if self.priority(rhs.end).is_none() {
            return Err(NfaError::UnsetPriority(rhs.end));
        }

        self.fetch_edges(lhs.start, rhs.start);
        self.attach_state(rhs.start, NodeState::Normal);
        Ok(lhs)
    }

    /// Zero or more repetitions.
    pub fn kleene_star(&mut self, c: Component) -> Component {
        let start = self.create_node(NodeState::Start);
        let end = self.create_node(NodeState::End);
        self.attach_state(c.start, NodeState::Normal);
        self.attach_state(c.end, NodeState::Normal);

        self.add_epsilon(c.end, c.start);
        self.add_epsilon(start, c.start);
        self.add_epsilon(c.start, end);

        Component{ start, end }
    }

    /// Zero or one occurrence, by a bypass edge from start to end.
    pub fn optional(&mut self, c: Component) -> Component {
        self.add_epsilon(c.start, c.end);
        c
    }

    /// One or more repetitions.
    pub fn least_one(&mut self, c: Component) -> Component {
        let start = self.create_node(NodeState::Start);
        let end = self.create_node(NodeState::End);
        self.attach_state(c.start, NodeState::Normal);
        self.attach_state(c.end, NodeState::Normal);

        self.add_epsilon(start, c.start);
        self.add_epsilon(c.end, end);
        self.add_epsilon(c.end, c.start);

        Component{ start, end }
    }

    /// Folds `concatenate` from the right. `None` for no components.
    pub fn concatenate_all<I>(&mut self, comps: I) -> Option<Component>
        where I : IntoIterator<Item = Component>, I::IntoIter : DoubleEndedIterator {

        let mut it = comps.into_iter().rev();
        let last = it.next()?;
        Some(it.fold(last, |acc, c| self.concatenate(c, acc)))
    }

    /// Folds `union` from the right. `None` for no components.
    pub fn union_all<I>(&mut self, comps: I) -> Option<Component>
        where I : IntoIterator<Item = Component>, I::IntoIter : DoubleEndedIterator {

        let mut it = comps.into_iter().rev();
        let last = it.next()?;
        Some(it.fold(last, |acc, c| self.union(c, acc)))
    }

    /// Folds `union_with_multi_end` from the right. `Ok(None)` for no
    /// components.
    pub fn union_all_with_multi_end<I>(&mut self, comps: I) -> Result<Option<Component>, NfaError>
        where I : IntoIterator<Item = Component>, I::IntoIter : DoubleEndedIterator {

        let mut it = comps.into_iter().rev();
        let mut acc = match it.next() {
            Some(c) => c,
            None => return Ok(None),
        };
        for c in it {
            acc = self.union_with_multi_end(c, acc)?;
        }
        Ok(Some(acc))
    }

    /// Copies everything reachable from the component's start into a densely
    /// numbered automaton. Numbers follow a depth-first traversal that visits
    /// edges in order, so the start is always node 0.
    pub fn build_nfa(&self, comp: Component) -> Nfa {
        let mut number: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut order = Vec::new();

        let mut stk = vec![comp.start];
        while let Some(u) = stk.pop() {
            if number[u.0].is_some() {
                continue;
            }
            number[u.0] = Some(order.len());
            order.push(u);
            for edge in self.nodes[u.0].edges.iter().rev() {
                if number[edge.next.0].is_none() {
                    stk.push(edge.next);
                }
            }
        }

        let nodes = order.iter().enumerate().map(|(i, u)| {
            let old = &self.nodes[u.0];
            let edges = old.edges.iter()
                .filter_map(|e| number[e.next.0].map(|n| NfaEdge::new(e.mask, NodeId(n))))
                .collect();
            NfaNode{ state: old.state, priority: old.priority, number: i, edges }
        }).collect();

        Nfa{ nodes }
    }
}

/**
 * The finished automaton.
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    nodes: Vec<NfaNode>,
}

impl Nfa {
    pub fn start(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NfaNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[NfaNode] {
        &self.nodes
    }

    pub fn ends(&self) -> impl Iterator<Item = &NfaNode> + '_ {
        self.nodes.iter().filter(|n| n.is_end())
    }

    /// Whether the whole input is accepted, by simulating every path at once.
    pub fn is_match(&self, input: &[u8]) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut closures = EpsilonClosures::new(self);
        let mut current: BTreeSet<usize> = closures.closure(self, self.start()).iter().collect();

        for &b in input {
            let mut next = BTreeSet::new();
            for &u in &current {
                for edge in &self.nodes[u].edges {
                    if edge.accepts(b) {
                        next.extend(closures.closure(self, edge.next).iter());
                    }
                }
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }

        current.iter().any(|u| self.nodes[*u].is_end())
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            for edge in &node.edges {
                let to = &self.nodes[edge.next.0];
                if edge.is_epsilon() {
                    writeln!(f, "{} --eps--> {}", DisplayNode(node), DisplayNode(to))?;
                }
                else {
                    writeln!(f, "{} --{:?}--> {}", DisplayNode(node), edge.mask, DisplayNode(to))?;
                }
            }
        }
        Ok(())
    }
}

struct DisplayNode<'a>(&'a NfaNode);

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
 * Epsilon closures, memoized per node number.
 */

pub struct EpsilonClosures {
    memo: Vec<Option<NumberSet>>,
}

impl EpsilonClosures {
    pub fn new(nfa: &Nfa) -> Self {
        Self{ memo: vec![None; nfa.len()] }
    }

    /// Every node reachable from `u` through epsilon edges only, `u` included.
    pub fn closure(&mut self, nfa: &Nfa, u: NodeId) -> NumberSet {
        if let Some(set) = &self.memo[u.0] {
            return set.clone();
        }

        let mut result = BTreeSet::new();
        let mut stk = vec![u];
        while let Some(v) = stk.pop() {
            if !result.insert(v.0) {
                continue;
            }
            // A finished closure is complete, no need to walk through it again
            if let Some(done) = &self.memo[v.0] {
                result.extend(done.iter());
                continue;
            }
            for edge in nfa.node(v).edges() {
                if edge.is_epsilon() && !result.contains(&edge.next.0) {
                    stk.push(edge.next);
                }
            }
        }

        let set = NumberSet::from(result);
        self.memo[u.0] = Some(set.clone());
        set
    }
}
