//! The edge set and the dedup set, owned by the frontier manager alone.
//!
//! The edge set is kept sorted by ascending heuristic, so the next state to dispatch is the
//! last one. Between sorts freshly ingested states sit at the tail unsorted; only the segment
//! likely to be consumed before the next sort is re-sorted unless the bound moved.

use rustc_hash::FxHashSet;

use crate::board::CompactState;

#[derive(Debug, Default)]
pub struct Frontier {
    edge: Vec<CompactState>,
    seen: FxHashSet<CompactState>,
}

impl Frontier {
    /// A frontier holding only `root`, which is also marked as seen.
    pub fn seeded(root: CompactState) -> Self {
        let mut frontier = Frontier::default();
        frontier.insert(root);
        frontier
    }

    /// States waiting for dispatch.
    #[inline]
    pub fn len(&self) -> usize {
        self.edge.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edge.is_empty()
    }

    /// Every state ever admitted, including already dispatched ones. Never shrinks.
    #[inline]
    pub fn seen(&self) -> usize {
        self.seen.len()
    }

    #[inline]
    pub fn has_seen(&self, state: &CompactState) -> bool {
        self.seen.contains(state)
    }

    /// Admit `state` unless its occupancy was seen before. Returns whether it was admitted.
    pub fn insert(&mut self, state: CompactState) -> bool {
        if !self.seen.insert(state) {
            return false;
        }
        self.edge.push(state);
        true
    }

    /// Drop tail states whose score exceeds `bound`. Returns how many were dropped.
    pub fn prune_tail(&mut self, bound: u32) -> usize {
        let before = self.edge.len();
        while self.edge.last().is_some_and(|s| s.score > bound) {
            self.edge.pop();
        }
        before - self.edge.len()
    }

    /// The state that would be dispatched next.
    #[inline]
    pub fn peek_next(&self) -> Option<&CompactState> {
        self.edge.last()
    }

    #[inline]
    pub fn pop_next(&mut self) -> Option<CompactState> {
        self.edge.pop()
    }

    /// Re-sort by ascending heuristic.
    ///
    /// Only the last `fresh + window` states are sorted unless `full` is set; `full` is needed
    /// after the bound moves because pruning may then reach past the sorted tip.
    pub fn sort_for_dispatch(&mut self, fresh: usize, window: usize, full: bool) {
        let offset = if full {
            0
        } else {
            self.edge.len().saturating_sub(fresh + window)
        };
        self.edge[offset..].sort_by(|a, b| a.heuristic.total_cmp(&b.heuristic));
    }

    /// States in storage order; the last one is dispatched first.
    pub fn iter(&self) -> impl Iterator<Item = &CompactState> {
        self.edge.iter()
    }
}
