//! A compact CSR (compressed sparse row) adjacency graph.
//!
//! Memory layout:
//! - `offsets`: `Vec<usize>` of length `n + 1` (row offsets)
//! - `targets`: contiguous neighbor indices for each row, in insertion order
//!
//! Duplicate edges and self-loops are kept exactly as given.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraversalError};

/// An immutable directed graph over nodes `0..node_count()`.
///
/// Serializes as a plain adjacency list (`[[1, 2], [0], []]`).
///
/// ### Performance Characteristics
/// | Operation | Complexity |
/// |-----------|------------|
/// | `from_adjacency` | \(O(n + m)\) |
/// | `from_edges` | \(O(n + m)\) |
/// | `neighbors` | \(O(1)\) |
/// | `degree` | \(O(1)\) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct Graph {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl Graph {
    /// Builds a graph from one neighbor list per node.
    ///
    /// # Errors
    /// [`TraversalError::EdgeOutOfRange`] if a neighbor is not a node.
    pub fn from_adjacency<A: AsRef<[usize]>>(adjacency: &[A]) -> Result<Self> {
        let n = adjacency.len();

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut total = 0usize;
        for nbrs in adjacency {
            total += nbrs.as_ref().len();
            offsets.push(total);
        }

        let mut targets = Vec::with_capacity(total);
        for (u, nbrs) in adjacency.iter().enumerate() {
            for &v in nbrs.as_ref() {
                if v >= n {
                    return Err(TraversalError::EdgeOutOfRange {
                        from: u,
                        to: v,
                        node_count: n,
                    });
                }
                targets.push(v);
            }
        }

        Ok(Self { offsets, targets })
    }

    /// Builds a graph with `node_count` nodes from `(from, to)` pairs.
    ///
    /// Each node's neighbors keep the order in which its edges appear in `edges`.
    ///
    /// # Errors
    /// [`TraversalError::EdgeOutOfRange`] if either endpoint is not a node.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut offsets = vec![0usize; node_count + 1];
        for &(from, to) in edges {
            if from >= node_count || to >= node_count {
                return Err(TraversalError::EdgeOutOfRange {
                    from,
                    to,
                    node_count,
                });
            }
            offsets[from + 1] += 1;
        }
        for i in 0..node_count {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets.clone();
        let mut targets = vec![0usize; edges.len()];
        for &(from, to) in edges {
            targets[cursor[from]] = to;
            cursor[from] += 1;
        }

        Ok(Self { offsets, targets })
    }

    /// Builds a graph directly from CSR parts.
    ///
    /// # Errors
    /// [`TraversalError::MalformedCsr`] if `offsets` is empty, not monotone, does not
    /// start at 0 or does not end at `targets.len()`;
    /// [`TraversalError::EdgeOutOfRange`] if a target is not a node.
    pub fn from_csr_parts(offsets: Vec<usize>, targets: Vec<usize>) -> Result<Self> {
        let Some((&first, &last)) = offsets.first().zip(offsets.last()) else {
            return Err(TraversalError::MalformedCsr(
                "offsets must have length n + 1".into(),
            ));
        };
        if first != 0 {
            return Err(TraversalError::MalformedCsr(format!(
                "offsets must start at 0, got {first}"
            )));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(TraversalError::MalformedCsr(
                "offsets must be monotone".into(),
            ));
        }
        if last != targets.len() {
            return Err(TraversalError::MalformedCsr(format!(
                "last offset {last} does not match {} targets",
                targets.len()
            )));
        }

        let graph = Self { offsets, targets };
        let n = graph.node_count();
        for u in 0..n {
            if let Some(&v) = graph.neighbors(u).iter().find(|&&v| v >= n) {
                return Err(TraversalError::EdgeOutOfRange {
                    from: u,
                    to: v,
                    node_count: n,
                });
            }
        }
        Ok(graph)
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        // `offsets` is length `n + 1` by construction.
        self.offsets.len() - 1
    }

    /// Number of edges, duplicates and self-loops included.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Returns `true` if `node` is a valid index.
    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        node < self.node_count()
    }

    /// Out-neighbors of `node`, in insertion order.
    ///
    /// # Panics
    /// Panics if `node` is out of range.
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        assert!(self.contains(node), "node {node} out of bounds");
        &self.targets[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Out-degree of `node`.
    ///
    /// # Panics
    /// Panics if `node` is out of range.
    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    /// Copies the graph back into one neighbor list per node.
    pub fn to_adjacency(&self) -> Vec<Vec<usize>> {
        (0..self.node_count())
            .map(|u| self.neighbors(u).to_vec())
            .collect()
    }

    /// Checks that `start` can begin a traversal.
    pub(crate) fn check_start(&self, start: usize) -> Result<()> {
        if self.contains(start) {
            Ok(())
        } else {
            Err(TraversalError::StartOutOfRange {
                start,
                node_count: self.node_count(),
            })
        }
    }
}

impl TryFrom<Vec<Vec<usize>>> for Graph {
    type Error = TraversalError;

    fn try_from(adjacency: Vec<Vec<usize>>) -> Result<Self> {
        Self::from_adjacency(&adjacency)
    }
}

impl From<Graph> for Vec<Vec<usize>> {
    fn from(graph: Graph) -> Self {
        graph.to_adjacency()
    }
}
