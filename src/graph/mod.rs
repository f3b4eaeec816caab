//! The immutable graph and the per-traversal state built around it.
//!
//! - `adjacency`: CSR adjacency storage, read-only during traversal
//! - `visited`: branded atomic visited set, one per traversal call
//! - `record`: the serialized visitation-order record and its sinks

pub mod adjacency;
pub mod record;
pub mod visited;

pub use adjacency::Graph;
pub use record::{from_fn, FnSink, VisitSink};
pub use visited::VisitedSet;
