//! Parallel traversal engines.
//!
//! Two independent strategies over the same [`Graph`]:
//! - [`FrontierBfs`]: level-synchronous BFS, one barrier per frontier
//! - [`TaskDfs`]: recursive DFS, one task per undiscovered neighbor, joined per node
//!
//! With the `parallel` feature, [`pool`] runs both on a rayon thread pool.

mod bfs;
mod dfs;
#[cfg(feature = "parallel")]
pub mod pool;

pub use bfs::FrontierBfs;
pub use dfs::TaskDfs;

use crate::{error::Result, graph::VisitedSet, Graph, TraversalConfig};

/// Counters reported by a finished traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes visited (and recorded).
    pub visited: usize,
    /// BFS frontiers expanded; `0` for DFS.
    pub levels: usize,
    /// Threads that could run traversal work at the same time.
    pub workers: usize,
    /// DFS tasks that ran on their own thread; `0` for BFS.
    pub spawned_tasks: usize,
}

/// Frontier-parallel BFS from `start` with the default configuration.
///
/// Every node at distance `k` from `start` precedes every node at distance `k + 1`.
///
/// ```rust
/// let g = parwalk::Graph::from_adjacency(&[vec![1, 2], vec![3], vec![3], vec![]]).unwrap();
/// let order = parwalk::bfs(&g, 0).unwrap();
/// assert_eq!(order[0], 0);
/// assert_eq!(order[3], 3);
/// ```
///
/// # Errors
/// [`TraversalError::StartOutOfRange`](crate::TraversalError::StartOutOfRange) if
/// `start` is not a node.
pub fn bfs(graph: &Graph, start: usize) -> Result<Vec<usize>> {
    FrontierBfs::new(TraversalConfig::default()).run(graph, start)
}

/// Task-parallel DFS from `start` with the default configuration.
///
/// Every node is recorded after the node whose exploration discovered it.
///
/// # Errors
/// [`TraversalError::StartOutOfRange`](crate::TraversalError::StartOutOfRange) if
/// `start` is not a node.
pub fn dfs(graph: &Graph, start: usize) -> Result<Vec<usize>> {
    TaskDfs::new(TraversalConfig::default()).run(graph, start)
}

/// Fails loudly if the visited set and the record disagree.
///
/// Each false -> true transition must produce exactly one recorded visit; any
/// other outcome is a defect in the engine, never a runtime condition.
fn assert_consistent(visited: &VisitedSet<'_>, recorded: usize) {
    let transitions = visited.visited_count();
    assert_eq!(
        transitions, recorded,
        "visited-set transitions diverged from recorded visits"
    );
}
