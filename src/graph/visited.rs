//! Branded visited sets for graph traversals.
//!
//! A `VisitedSet<'brand>` is created fresh by every traversal call, inside that
//! call's `GhostToken` scope, and dropped when the call returns.

use core::sync::atomic::Ordering;

use crate::concurrency::atomic::GhostAtomicBitset;
use crate::GhostToken;

/// A dense, word-packed visited set.
///
/// Each entry moves false -> true at most once. The caller whose
/// [`try_visit`](Self::try_visit) performs that transition owns the node.
pub struct VisitedSet<'brand> {
    bits: GhostAtomicBitset<'brand>,
}

impl<'brand> VisitedSet<'brand> {
    /// Creates a set of `nodes` entries, all unvisited.
    #[inline]
    pub fn new(nodes: usize) -> Self {
        Self {
            bits: GhostAtomicBitset::new(nodes),
        }
    }

    /// Creates a set branded with the traversal scope of `token`.
    #[inline]
    pub fn for_scope(_token: &GhostToken<'brand>, nodes: usize) -> Self {
        Self::new(nodes)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len_bits()
    }

    /// Returns `true` if the set has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` iff this call observed the node as not-yet-visited and marked it.
    #[inline(always)]
    pub fn try_visit(&self, node: usize, order: Ordering) -> bool {
        self.bits.test_and_set(node, order)
    }

    /// Snapshot read of one entry. Only a hint while other workers are running.
    #[inline(always)]
    pub fn is_visited(&self, node: usize) -> bool {
        self.bits.is_set(node)
    }

    /// Number of visited entries, once writers are quiescent.
    pub fn visited_count(&self) -> usize {
        self.bits.count_ones()
    }
}
