//! Error types for graph construction and traversal.
//!
//! Every error is reported synchronously, before any worker thread is started.
//! Nothing in this crate retries.

use thiserror::Error;

/// Coarse classification of a [`TraversalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed a value outside the accepted domain.
    InvalidArgument,
    /// The runtime could not provide a resource (e.g. a thread pool).
    Internal,
}

/// Errors surfaced by graph construction and the traversal engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    /// The start node is not in `[0, node_count)`.
    #[error("start node {start} is out of range for a graph of {node_count} nodes")]
    StartOutOfRange {
        /// Requested start node.
        start: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// An edge targets a node that does not exist.
    #[error("edge {from}->{to} is out of range for a graph of {node_count} nodes")]
    EdgeOutOfRange {
        /// Source node of the edge.
        from: usize,
        /// Target node of the edge.
        to: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// CSR offsets/targets do not describe a graph.
    #[error("malformed CSR: {0}")]
    MalformedCsr(String),

    /// A [`TraversalConfig`](crate::TraversalConfig) field is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl TraversalError {
    /// Returns the error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StartOutOfRange { .. }
            | Self::EdgeOutOfRange { .. }
            | Self::MalformedCsr(_)
            | Self::InvalidConfig(_) => ErrorKind::InvalidArgument,
            Self::ThreadPool(_) => ErrorKind::Internal,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, TraversalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let e = TraversalError::StartOutOfRange {
            start: 7,
            node_count: 3,
        };
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            e.to_string(),
            "start node 7 is out of range for a graph of 3 nodes"
        );

        assert_eq!(
            TraversalError::ThreadPool("boom".into()).kind(),
            ErrorKind::Internal
        );
    }
}
