use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::SearchError;
use crate::state::AugmentedNode;

/// Open-list entry. Several entries may exist for the same node; only the one
/// whose `cost` matches the best recorded cost is live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontierEntry {
    pub node: AugmentedNode,
    pub cost: usize,
    pub priority: usize,
    sequence: u64,
}

impl FrontierEntry {
    pub fn new(node: AugmentedNode, cost: usize, priority: usize) -> Self {
        FrontierEntry {
            node,
            cost,
            priority,
            sequence: 0,
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            // Equal priorities pop in insertion order.
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered frontier with O(log n) push and pop.
#[derive(Debug, Default)]
pub struct Frontier {
    open_list: BTreeSet<FrontierEntry>,
    next_sequence: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut entry: FrontierEntry) {
        entry.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.open_list.insert(entry);
        self.high_water = self.high_water.max(self.open_list.len());
    }

    pub fn pop_min(&mut self) -> Result<FrontierEntry, SearchError> {
        self.open_list
            .pop_first()
            .ok_or(SearchError::EmptyFrontier)
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&FrontierEntry) -> bool,
    {
        self.open_list.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.open_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open_list.is_empty()
    }

    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
