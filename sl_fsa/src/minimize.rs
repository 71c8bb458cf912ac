/**
 * DFA minimization by partition refinement.
 *
 * States start out grouped by whether they accept and with which priority, so
 * accepting states of different token patterns can never collapse into one.
 * Blocks are then split by where their members go on each byte until no block
 * splits anymore.
 */

use std::collections::{BTreeMap, BTreeSet};
use crate::dfa::{Dfa, DfaNode, StateId};
use crate::node::NodeState;
use crate::number_set::NumberSet;

impl Dfa {
    /// An equivalent automaton with the fewest states. A single state
    /// automaton is returned as a copy.
    pub fn minimize(&self) -> Dfa {
        Minimizer::new(self).minimize()
    }
}

struct Minimizer<'a> {
    dfa: &'a Dfa,
    partition: Vec<NumberSet>,
    // Block index of every state in the current partition
    block_of: Vec<usize>,
}

impl <'a> Minimizer<'a> {
    fn new(dfa: &'a Dfa) -> Self {
        Self{ dfa, partition: Vec::new(), block_of: vec![0; dfa.len()] }
    }

    fn init_partition(&mut self) {
        let mut groups: BTreeMap<(bool, Option<usize>), BTreeSet<usize>> = BTreeMap::new();
        for node in self.dfa.nodes() {
            groups.entry((node.is_end(), node.priority()))
                .or_default()
                .insert(node.number());
        }
        self.partition = groups.into_iter().map(|(_, s)| NumberSet::from(s)).collect();
    }

    fn build_block_map(&mut self) {
        for (i, block) in self.partition.iter().enumerate() {
            for u in block {
                self.block_of[u] = i;
            }
        }
    }

    fn edge_bytes(&self, block: &NumberSet) -> BTreeSet<u8> {
        block.iter()
            .flat_map(|u| self.dfa.nodes()[u].edges().keys().copied())
            .collect()
    }

    /// Groups the block's states by the block their `b` transition leads
    /// into. States without a transition on `b` form their own group.
    fn split_by_byte(&self, block: &NumberSet, b: u8) -> Vec<NumberSet> {
        let mut groups: BTreeMap<Option<usize>, BTreeSet<usize>> = BTreeMap::new();
        for u in block {
            let target = self.dfa.nodes()[u].next(b).map(|v| self.block_of[v.id()]);
            groups.entry(target).or_default().insert(u);
        }
        groups.into_iter().map(|(_, s)| NumberSet::from(s)).collect()
    }

    fn refine(&mut self) {
        loop {
            self.build_block_map();

            let mut next = Vec::with_capacity(self.partition.len());
            let mut changed = false;

            for block in &self.partition {
                // The first byte that splits the block is enough for this pass
                let parted = self.edge_bytes(block)
                    .into_iter()
                    .map(|b| self.split_by_byte(block, b))
                    .find(|parts| parts.len() > 1);

                match parted {
                    Some(parts) => {
                        changed = true;
                        next.extend(parts);
                    },
                    None => next.push(block.clone()),
                }
            }

            self.partition = next;
            if !changed {
                break;
            }
        }
    }

    fn construct_from_blocks(&mut self) -> Dfa {
        // Order the blocks by their smallest member so the start block comes
        // first whenever the start is state 0
        self.partition.sort_by_key(|block| block.first());
        self.build_block_map();

        let mut nodes: Vec<DfaNode> = self.partition.iter()
            .map(|_| DfaNode::new(NodeState::Normal))
            .collect();
        let mut start = StateId::default();

        for (i, block) in self.partition.iter().enumerate() {
            for u in block {
                let old = &self.dfa.nodes()[u];
                if old.is_start() {
                    nodes[i].attach_state(NodeState::Start);
                    start = StateId::from_index(i);
                }
                if old.is_end() {
                    nodes[i].fold_end(old.priority());
                }
            }
        }

        // Members of a block are equivalent, any of them gives the edges
        for (i, block) in self.partition.iter().enumerate() {
            if let Some(repr) = block.first() {
                for (b, to) in self.dfa.nodes()[repr].edges() {
                    nodes[i].add_edge(*b, StateId::from_index(self.block_of[to.id()]));
                }
            }
        }

        Dfa::from_parts(start, nodes)
    }

    fn minimize(mut self) -> Dfa {
        if self.dfa.len() <= 1 {
            return self.dfa.clone();
        }

        self.init_partition();
        self.refine();
        let min = self.construct_from_blocks();
        log::debug!("minimized DFA from {} to {} states", self.dfa.len(), min.len());
        min
    }
}
