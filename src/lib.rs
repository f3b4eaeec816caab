//! # `parwalk` - Shared-Memory Parallel Graph Traversal
//!
//! Two traversal strategies over an immutable adjacency-list [`Graph`]:
//!
//! - **Frontier-parallel BFS** ([`FrontierBfs`], [`bfs`]): level-synchronous. A
//!   crew of workers expands one frontier at a time, each collecting newly
//!   discovered nodes in a private buffer; a barrier separates the levels.
//! - **Task-parallel DFS** ([`TaskDfs`], [`dfs`]): recursive. Exploring a node
//!   starts one task per still-unvisited neighbor and waits for all of them.
//!
//! ## Guarantees
//!
//! - Every node reachable from `start` is recorded exactly once; nothing else is.
//! - BFS records all nodes at distance `k` before any node at distance `k + 1`.
//! - DFS records a node before every node its exploration discovered.
//! - Running with one worker or many yields the same *set* of nodes.
//!
//! ## Architecture
//!
//! Each traversal call opens a fresh [`GhostToken`] scope. The call's visited
//! set ([`graph::VisitedSet`], one atomic bit per node claimed by `fetch_or`) and
//! its frontier barrier carry that scope's brand, so per-call state cannot leak
//! into another call. The visitation record is a single mutex-guarded
//! [`VisitSink`]; the graph is shared read-only.
//!
//! ## Example
//!
//! ```rust
//! use parwalk::{FrontierBfs, Graph, TaskDfs, TraversalConfig};
//!
//! let graph = Graph::from_adjacency(&[
//!     vec![1, 2],
//!     vec![0, 3, 4],
//!     vec![0, 4],
//!     vec![1, 5],
//!     vec![1, 2, 5],
//!     vec![3, 4],
//! ])?;
//!
//! let config = TraversalConfig::new().with_threads(4);
//! let levels = FrontierBfs::new(config.clone()).run_levels(&graph, 0)?;
//! assert_eq!(levels.len(), 4);
//!
//! let order = TaskDfs::new(config).run(&graph, 0)?;
//! assert_eq!(order[0], 0);
//! assert_eq!(order.len(), 6);
//! # Ok::<(), parwalk::TraversalError>(())
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod config;
pub mod error;
pub mod graph;
pub mod token;
pub mod traversal;

pub use config::TraversalConfig;
pub use error::{ErrorKind, Result, TraversalError};
pub use graph::{Graph, VisitSink};
pub use token::GhostToken;
pub use traversal::{bfs, dfs, FrontierBfs, TaskDfs, TraversalStats};

const _: () = {
    use core::mem;

    // Tokens are ZSTs.
    assert!(mem::size_of::<GhostToken<'static>>() == 0);
};
